use std::time::Duration;

use cgmath::Vector3;

use crate::config::DemoConfig;
use crate::context::SceneContext;

const VIEWPORT_WIDTH: u32 = 1280;

/// What a headless run did, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub frames: u32,
    /// Frames in which the rocket was moved.
    pub moved_frames: u32,
    pub final_progress: f32,
    pub final_position: Option<Vector3<f32>>,
}

/// Runs the demo without a window. The page is scrolled from top to bottom over
/// the run and the clock advances by one frame time per frame, so a run is
/// reproducible apart from when the models finish loading.
pub fn run(config: DemoConfig, frames: u32, fps: u32) -> anyhow::Result<HeadlessReport> {
    let viewport_height = config.page.viewport_height.max(1.0) as u32;
    let mut context = SceneContext::new(config, VIEWPORT_WIDTH, viewport_height)?;
    context.start_loading()?;

    let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let log_every = fps.max(1);
    let mut elapsed = Duration::ZERO;
    let mut moved_frames = 0;

    for frame in 0..frames {
        let fraction = if frames > 1 {
            frame as f32 / (frames - 1) as f32
        } else {
            1.0
        };
        let max_scroll = context.page().max_scroll();
        context.scroll_to(fraction * max_scroll);

        match context.update(elapsed) {
            Some(pose) => {
                moved_frames += 1;
                if frame % log_every == 0 {
                    log::info!(
                        "frame {}: t = {:.3}, rocket at ({:.2}, {:.2}, {:.2})",
                        frame,
                        context.progress(),
                        pose.position.x,
                        pose.position.y,
                        pose.position.z
                    );
                }
            }
            None => {
                if context.is_loading() {
                    // Nothing to draw yet; spend the frame waiting for a model.
                    context.wait_for_load(frame_time);
                } else if frame % log_every == 0 {
                    log::warn!("frame {}: nothing to move", frame);
                }
            }
        }
        elapsed += frame_time;
    }

    let report = HeadlessReport {
        frames,
        moved_frames,
        final_progress: context.progress(),
        final_position: context
            .scene()
            .rocket
            .as_ref()
            .map(|rocket| rocket.node.position),
    };
    log::info!("headless run finished: {:?}", report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::run;
    use crate::demos::{preset, Demos};

    #[test]
    fn scroll_demo_reaches_the_end() {
        let report = run(preset(Demos::Spiral), 120, 60).unwrap();
        assert_eq!(120, report.frames);
        assert!(report.moved_frames > 0);
        assert_eq!(1.0, report.final_progress);
        assert!(report.final_position.is_some());
    }

    #[test]
    fn missing_rocket_is_not_fatal() {
        let mut config = preset(Demos::Waypoints);
        config.rocket.asset = PathBuf::from("models/no_such_rocket.obj");
        let report = run(config, 30, 60).unwrap();
        assert_eq!(0, report.moved_frames);
        assert!(report.final_position.is_none());
    }
}
