//! Playlist viewer demo application.
//!
//! This binary hosts the `PlaylistView` widget in an eframe window:
//! - The widget's offscreen image is uploaded as a texture and blitted
//! - Mouse, keyboard and wheel input is mapped to the widget's event types
//! - A header offers a file-open dialog, a skin selector and a flat toggle
//!
//! The host plays the roles the widget leaves to collaborators: it owns the
//! window, decodes OS input, and acts on item activations (here: marking
//! the item as playing).

use eframe::egui;
use playtree::{
    CosmicFontEngine, InputEvent, Key, Modifiers, MouseKind, PlayTree, PlaylistView,
    SkinManager, TraversalMode, TreeEvent, WidgetSize, read_playlist,
};
use std::path::PathBuf;

const FONT_SIZE: f32 = 14.0;

fn main() -> eframe::Result {
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 640.0])
            .with_title("Playlist Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Playlist Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(PlaylistApp::new(initial_file)))),
    )
}

struct PlaylistApp {
    view: PlaylistView,
    skins: SkinManager,
    flat: bool,
    texture: Option<egui::TextureHandle>,
    status: String,
}

impl PlaylistApp {
    fn new(initial_file: Option<PathBuf>) -> Self {
        let mut view = PlaylistView::new(
            TraversalMode::Hierarchical,
            Box::new(CosmicFontEngine::new(FONT_SIZE)),
        );

        let loaded = initial_file.as_ref().map(read_playlist);
        let status = match loaded {
            Some(Ok(tree)) => {
                *view.tree_mut() = tree;
                view.on_tree_event(TreeEvent::Reset);
                format!("Loaded {}", initial_file.unwrap().display())
            }
            Some(Err(err)) => format!("{err:#}"),
            None => {
                *view.tree_mut() = demo_tree();
                view.on_tree_event(TreeEvent::Reset);
                "Demo playlist".to_string()
            }
        };

        Self {
            view,
            skins: SkinManager::new(),
            flat: false,
            texture: None,
            status,
        }
    }

    fn load_file(&mut self, path: &PathBuf) {
        match read_playlist(path) {
            Ok(tree) => {
                *self.view.tree_mut() = tree;
                self.view.on_tree_event(TreeEvent::Reset);
                self.status = format!("Loaded {}", path.display());
            }
            Err(err) => self.status = format!("{err:#}"),
        }
    }

    /// The traversal mode is fixed per widget instance, so toggling it
    /// means rebuilding the view around the same tree.
    fn set_flat(&mut self, flat: bool) {
        self.flat = flat;
        let mode = if flat {
            TraversalMode::Flat
        } else {
            TraversalMode::Hierarchical
        };
        let tree = std::mem::take(self.view.tree_mut());
        let mut view = PlaylistView::new(mode, Box::new(CosmicFontEngine::new(FONT_SIZE)));
        *view.tree_mut() = tree;
        view.set_colors(self.current_colors());
        view.on_tree_event(TreeEvent::Reset);
        self.view = view;
    }

    fn current_colors(&self) -> playtree::SkinColors {
        self.skins.current_skin().colors.clone()
    }

    fn header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Playlist").clicked() {
                let mut dialog = rfd::FileDialog::new().add_filter("Playlists", &["json"]);
                if let Ok(cwd) = std::env::current_dir() {
                    dialog = dialog.set_directory(cwd);
                }
                if let Some(path) = dialog.pick_file() {
                    self.load_file(&path);
                }
            }

            let mut flat = self.flat;
            ui.checkbox(&mut flat, "Flat");
            if flat != self.flat {
                self.set_flat(flat);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let old_skin = self.skins.current_skin_name().to_string();
                let mut current = old_skin.clone();
                egui::ComboBox::from_id_salt("skin_selector")
                    .selected_text(&current)
                    .show_ui(ui, |ui| {
                        for name in self.skins.list_skins() {
                            ui.selectable_value(&mut current, name.to_string(), name);
                        }
                    });
                if current != old_skin && self.skins.set_current_skin(&current).is_ok() {
                    let colors = self.current_colors();
                    self.view.set_colors(colors);
                }
            });
        });
    }

    fn widget_area(&mut self, ui: &mut egui::Ui) {
        let avail = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(avail, egui::Sense::click());

        let size = WidgetSize::new(rect.width().max(0.0) as u32, rect.height().max(0.0) as u32);
        if self.view.image().map(|img| (img.width(), img.height())) != Some((size.width, size.height))
        {
            self.view.set_geometry(Some(size));
        }

        for event in self.collect_events(ui, &response, rect) {
            let outcome = self.view.handle_event(event);
            if let Some(id) = outcome.activated {
                self.view.tree_mut().set_playing(id);
                let label = self
                    .view
                    .tree()
                    .get(id)
                    .map(|n| n.label.clone())
                    .unwrap_or_default();
                self.view.on_tree_event(TreeEvent::ItemUpdated { id, active: true });
                self.status = format!("Playing: {label}");
            }
        }

        if let Some(image) = self.view.image() {
            let w = image.width() as usize;
            let h = image.height() as usize;
            if w > 0 && h > 0 {
                let mut rgba = Vec::with_capacity(w * h * 4);
                for px in image.pixels() {
                    rgba.extend_from_slice(&px.to_srgba_unmultiplied());
                }
                let color_image = egui::ColorImage::from_rgba_unmultiplied([w, h], &rgba);
                if self.texture.is_none() {
                    self.texture = Some(ui.ctx().load_texture(
                        "playlist_image",
                        color_image,
                        egui::TextureOptions::NEAREST,
                    ));
                } else if let Some(texture) = self.texture.as_mut() {
                    texture.set(color_image, egui::TextureOptions::NEAREST);
                }
            }
        }
        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    fn collect_events(
        &self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: egui::Rect,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let local_pos = response
            .interact_pointer_pos()
            .map(|p| ((p.x - rect.min.x) as i32, (p.y - rect.min.y) as i32));
        if let Some((x, y)) = local_pos {
            if response.double_clicked() {
                events.push(InputEvent::Mouse {
                    kind: MouseKind::DoubleClick,
                    x,
                    y,
                });
            } else if response.clicked() {
                let mods = ui.input(|i| i.modifiers);
                events.push(InputEvent::Mouse {
                    kind: MouseKind::Down(Modifiers {
                        ctrl: mods.ctrl || mods.command,
                        shift: mods.shift,
                    }),
                    x,
                    y,
                });
            }
        }

        if response.hovered() {
            let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_y.abs() > 0.5 {
                events.push(InputEvent::Scroll { up: scroll_y > 0.0 });
            }
        }

        ui.input(|i| {
            for event in &i.events {
                if let egui::Event::Key {
                    key, pressed: true, ..
                } = event
                {
                    if let Some(mapped) = map_key(*key) {
                        events.push(InputEvent::KeyDown(mapped));
                    }
                }
            }
        });

        events
    }
}

fn map_key(key: egui::Key) -> Option<Key> {
    match key {
        egui::Key::ArrowUp => Some(Key::Up),
        egui::Key::ArrowDown => Some(Key::Down),
        egui::Key::ArrowLeft => Some(Key::Left),
        egui::Key::ArrowRight => Some(Key::Right),
        egui::Key::Enter => Some(Key::Enter),
        egui::Key::Space => Some(Key::Space),
        egui::Key::Delete => Some(Key::Delete),
        egui::Key::PageUp => Some(Key::PageUp),
        egui::Key::PageDown => Some(Key::PageDown),
        _ => None,
    }
}

fn demo_tree() -> PlayTree {
    let mut tree = PlayTree::new();
    let album1 = tree.add_node(None, "Glass Harbor - Meridian Tides");
    for title in ["01. Signal Wire (3:41)", "02. Polar Drift (4:05)", "03. Ember Parade (2:58)"] {
        tree.add_node(Some(album1), title);
    }
    tree.set_expanded(album1, true);

    let album2 = tree.add_node(None, "Karla Voss - Copper Night");
    for title in ["01. Ghost Arcade (5:12)", "02. Harvest Window (3:33)"] {
        tree.add_node(Some(album2), title);
    }

    tree.add_node(None, "Midnight Freight - Static (single)");
    tree
}

impl eframe::App for PlaylistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| self.header(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| self.widget_area(ui));
    }
}
