//! egui shell around the [`Annotator`]
//!
//! Every frame the shell reports the viewport size, forwards toolbar,
//! keyboard and pointer input as annotator events, and paints the rendered
//! page with its stroke overlay.

use crate::overlay;
use pdf_annotator_core::tool::{HIGHLIGHTER_WIDTH_RANGE, PEN_WIDTH_RANGE};
use pdf_annotator_core::{
    Annotator, AnnotatorConfig, CanvasFactory, FileHandle, PdfiumRenderer, SurfaceBounds, Tool,
};
use tracing::warn;

/// Identifies the rasterized page held in the texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageTextureKey {
    /// Bumped on every successful file load
    generation: u64,
    page: u32,
    width: u32,
    height: u32,
}

struct PageTexture {
    key: PageTextureKey,
    handle: egui::TextureHandle,
}

/// Keyboard action for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    PreviousPage,
    NextPage,
    Select(Option<Tool>),
}

pub struct AnnotatorApp {
    annotator: Annotator<PdfiumRenderer, CanvasFactory>,
    generation: u64,
    page_texture: Option<PageTexture>,
    /// Last key that failed to render, so a broken page is not retried every frame
    failed_render: Option<PageTextureKey>,
}

impl AnnotatorApp {
    pub fn new(config: &AnnotatorConfig, initial_file: Option<FileHandle>) -> Self {
        let mut app = Self {
            annotator: Annotator::new(PdfiumRenderer::new(), CanvasFactory, config),
            generation: 0,
            page_texture: None,
            failed_render: None,
        };

        if let Some(file) = initial_file {
            app.load(file);
        }
        app
    }

    /// Open a PDF file using the file picker
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        {
            self.load(FileHandle::new(path));
        }
    }

    fn load(&mut self, file: FileHandle) {
        if !file.has_pdf_extension() {
            self.annotator.notify(
                "Not a PDF",
                format!("{} is not a .pdf file", file.display_name()),
            );
            return;
        }

        if self.annotator.open_file(file).is_ok() {
            self.generation += 1;
            self.page_texture = None;
            self.failed_render = None;
        }
    }

    /// Texture for the current page at its display size, rendering on a miss
    fn page_texture(&mut self, ctx: &egui::Context, bounds: SurfaceBounds) -> Option<egui::TextureId> {
        let pixels_per_point = ctx.pixels_per_point();
        let key = PageTextureKey {
            generation: self.generation,
            page: self.annotator.session().current_page(),
            width: (bounds.width * pixels_per_point).round() as u32,
            height: (bounds.height * pixels_per_point).round() as u32,
        };

        if let Some(texture) = &self.page_texture {
            if texture.key == key {
                return Some(texture.handle.id());
            }
        }
        if self.failed_render == Some(key) {
            return None;
        }

        let page = match self.annotator.render_current_page(pixels_per_point) {
            Ok(page) => page,
            Err(e) => {
                warn!(page = key.page, error = %e, "failed to render page");
                self.failed_render = Some(key);
                return None;
            }
        };

        let size = [page.width as usize, page.height as usize];
        if page.pixels.len() != size[0] * size[1] * 4 {
            warn!(page = key.page, ?size, "rendered buffer does not match its size");
            self.failed_render = Some(key);
            return None;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(size, &page.pixels);
        let handle = ctx.load_texture(
            format!("page_{}", key.page),
            image,
            egui::TextureOptions::LINEAR,
        );
        let id = handle.id();
        self.page_texture = Some(PageTexture { key, handle });
        Some(id)
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_keyboard_shortcuts(ctx);
        self.draw_toolbar(ctx);
        self.draw_viewport(ctx);
        self.draw_notice(ctx);
    }
}

impl Drop for AnnotatorApp {
    fn drop(&mut self) {
        self.annotator.shutdown();
    }
}

impl AnnotatorApp {
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.load(FileHandle::new(path));
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        // Text fields (e.g. the color picker's hex input) keep their keys
        if ctx.wants_keyboard_input() {
            return;
        }

        let shortcut = ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowLeft) {
                Some(Shortcut::PreviousPage)
            } else if i.key_pressed(egui::Key::ArrowRight) {
                Some(Shortcut::NextPage)
            } else if i.key_pressed(egui::Key::P) {
                Some(Shortcut::Select(Some(Tool::Pen)))
            } else if i.key_pressed(egui::Key::H) {
                Some(Shortcut::Select(Some(Tool::Highlighter)))
            } else if i.key_pressed(egui::Key::E) {
                Some(Shortcut::Select(Some(Tool::Eraser)))
            } else if i.key_pressed(egui::Key::Escape) {
                Some(Shortcut::Select(None))
            } else {
                None
            }
        });

        match shortcut {
            Some(Shortcut::PreviousPage) => {
                self.annotator.previous_page();
            }
            Some(Shortcut::NextPage) => {
                self.annotator.next_page();
            }
            Some(Shortcut::Select(tool)) => {
                // Escape closes the notice before it deselects the tool
                if tool.is_none() && self.annotator.notice().is_some() {
                    self.annotator.dismiss_notice();
                } else {
                    self.annotator.select_tool(tool);
                }
            }
            None => {}
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(8.0);

                if ui.button("📂 Open").clicked() {
                    self.open_file_dialog();
                }

                ui.separator();

                let nav = self.annotator.navigation();
                if ui
                    .add_enabled(nav.can_previous, egui::Button::new("◀"))
                    .on_hover_text("Previous page (←)")
                    .clicked()
                {
                    self.annotator.previous_page();
                }
                ui.label(nav.indicator);
                if ui
                    .add_enabled(nav.can_next, egui::Button::new("▶"))
                    .on_hover_text("Next page (→)")
                    .clicked()
                {
                    self.annotator.next_page();
                }

                ui.separator();

                for tool in Tool::ALL {
                    self.tool_button(ui, tool);
                }

                ui.separator();
                self.pen_inputs(ui);
                ui.separator();
                self.highlighter_inputs(ui);
            });
        });
    }

    fn tool_button(&mut self, ui: &mut egui::Ui, tool: Tool) {
        let is_selected = self.annotator.tools().is_tool_active(tool);
        let hint = match tool {
            Tool::Pen => "P",
            Tool::Highlighter => "H",
            Tool::Eraser => "E",
        };
        if ui
            .selectable_label(is_selected, tool.label())
            .on_hover_text(hint)
            .clicked()
        {
            // Clicking the active tool puts it down again
            let next = if is_selected { None } else { Some(tool) };
            self.annotator.select_tool(next);
        }
    }

    fn pen_inputs(&mut self, ui: &mut egui::Ui) {
        let config = self.annotator.tools().config().clone();
        let enabled = self.annotator.tools().pen_inputs_enabled();

        ui.add_enabled_ui(enabled, |ui| {
            let mut rgb = overlay::to_rgb(config.pen_color);
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.annotator.set_pen_color(overlay::from_rgb(rgb));
            }

            let mut width = config.pen_width;
            if ui
                .add(egui::Slider::new(&mut width, PEN_WIDTH_RANGE).text("pen"))
                .changed()
            {
                self.annotator.set_pen_width(width);
            }
        });
    }

    fn highlighter_inputs(&mut self, ui: &mut egui::Ui) {
        let config = self.annotator.tools().config().clone();
        let enabled = self.annotator.tools().highlighter_inputs_enabled();

        ui.add_enabled_ui(enabled, |ui| {
            let mut rgb = overlay::to_rgb(config.highlighter_color);
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.annotator.set_highlighter_color(overlay::from_rgb(rgb));
            }

            let mut width = config.highlighter_width;
            if ui
                .add(egui::Slider::new(&mut width, HIGHLIGHTER_WIDTH_RANGE).text("highlighter"))
                .changed()
            {
                self.annotator.set_highlighter_width(width);
            }
        });
    }

    fn draw_viewport(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.annotator.session().is_loaded() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open or drop a PDF to start annotating");
                });
                return;
            }

            let panel = ui.available_rect_before_wrap();
            self.annotator.viewport_resized(panel.width(), panel.height());

            let Some(bounds) = self.annotator.page_bounds().filter(|b| !b.is_empty()) else {
                if self.annotator.session().total_pages() == 0 {
                    ui.centered_and_justified(|ui| {
                        ui.weak("This document has no pages");
                    });
                }
                return;
            };

            let rect = egui::Rect::from_center_size(
                panel.center(),
                egui::vec2(bounds.width, bounds.height),
            );
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            match self.page_texture(ctx, bounds) {
                Some(texture) => {
                    ui.painter().image(
                        texture,
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    ui.painter()
                        .rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
                }
            }

            let drawing = self.annotator.tools().active_tool().is_some();
            if let Some(canvas) = self.annotator.surface_mut() {
                overlay::route_pointer(ctx, &response, rect.min, canvas);
                overlay::paint(ui.painter(), rect, canvas);
            }

            if drawing {
                response.on_hover_cursor(egui::CursorIcon::Crosshair);
            }
        });
    }

    fn draw_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.annotator.notice() else {
            return;
        };

        let title = format!("⚠️ {}", notice.title);
        let message = notice.message.clone();

        let mut should_close = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(12.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.annotator.dismiss_notice();
        }
    }
}
