use egui::Slider;

use crate::context::SceneContext;
use crate::gui::Ui;
use crate::path::Path;
use crate::progress::ProgressSource;

/// Readouts for the rocket's progress, plus controls for the scroll position and damping.
pub struct PathUi {
    progress: f32,
    scroll_driven: bool,
    scroll_offset: f32,
    max_scroll: f32,
    scroll_changed: bool,
    damped: bool,
    damping: f32,
    rocket_position: Option<[f32; 3]>,
    loading: bool,
}

impl Ui for PathUi {
    fn ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("Path").show(ctx, |ui| {
            ui.label(format!("Progress: {:.3}", self.progress));
            match self.rocket_position {
                Some([x, y, z]) => ui.label(format!("Rocket: ({:.2}, {:.2}, {:.2})", x, y, z)),
                None if self.loading => ui.label("Rocket: loading"),
                None => ui.label("Rocket: not available"),
            };

            if self.scroll_driven {
                let response = ui.add(
                    Slider::new(&mut self.scroll_offset, 0.0..=self.max_scroll.max(1.0))
                        .text("Scroll (px)"),
                );
                self.scroll_changed |= response.changed();
            }

            // Damping only smooths polylines, splines are followed exactly.
            ui.add_enabled(
                self.damped,
                Slider::new(&mut self.damping, PathUi::DAMPING_MIN..=PathUi::DAMPING_MAX)
                    .text("Damping"),
            );
        });
    }
}

impl PathUi {
    const DAMPING_MIN: f32 = 0.01;
    const DAMPING_MAX: f32 = 1.0;

    pub fn new(context: &SceneContext) -> PathUi {
        let mut path_ui = PathUi {
            progress: 0.0,
            scroll_driven: context.config().progress == ProgressSource::Scroll,
            scroll_offset: 0.0,
            max_scroll: 0.0,
            scroll_changed: false,
            damped: false,
            damping: context.follower().damping(),
            rocket_position: None,
            loading: false,
        };
        path_ui.sync_from(context);
        path_ui
    }

    /// Refreshes the readouts after a frame update.
    pub fn sync_from(&mut self, context: &SceneContext) {
        self.progress = context.progress();
        self.max_scroll = context.page().max_scroll();
        if !self.scroll_changed {
            self.scroll_offset = context.page().scroll_offset();
        }
        self.damped = matches!(context.path(), Some(Path::Polyline(_)));
        self.rocket_position = context
            .scene()
            .rocket
            .as_ref()
            .map(|rocket| rocket.node.position.into());
        self.loading = context.is_loading();
    }

    /// Pushes edits made in the ui back into the context.
    pub fn apply_to(&mut self, context: &mut SceneContext) {
        if self.scroll_changed {
            context.scroll_to(self.scroll_offset);
            self.scroll_changed = false;
        }
        if context.follower().damping() != self.damping {
            context.follower_mut().set_damping(self.damping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PathUi;
    use crate::context::SceneContext;
    use crate::demos::{preset, Demos};

    #[test]
    fn edits_reach_the_context() {
        let mut context = SceneContext::new(preset(Demos::Orbit), 800, 600).unwrap();
        let mut path_ui = PathUi::new(&context);
        assert!(path_ui.scroll_driven);
        assert_eq!(0.1, path_ui.damping);

        path_ui.scroll_offset = 300.0;
        path_ui.scroll_changed = true;
        path_ui.damping = 0.5;
        path_ui.apply_to(&mut context);
        assert_eq!(300.0, context.page().scroll_offset());
        assert_eq!(0.5, context.follower().damping());

        path_ui.sync_from(&context);
        assert_eq!(300.0, path_ui.scroll_offset);
        assert!(path_ui.rocket_position.is_none());
    }

    #[test]
    fn clock_demo_has_no_scroll_control() {
        let context = SceneContext::new(preset(Demos::Waypoints), 800, 600).unwrap();
        let path_ui = PathUi::new(&context);
        assert!(!path_ui.scroll_driven);
        // Splines are not damped.
        assert!(!path_ui.damped);
    }
}
