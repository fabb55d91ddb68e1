use prngscope_core::{GeneratedStream, HeatmapGrid};

use super::InputArgs;
use crate::tui::app::{App, Panel};

pub fn run(input: &InputArgs) {
    let streams = super::generate_or_exit(input);
    show(&streams);
}

/// Open the interactive heat map for `streams`, one panel each.
pub fn show(streams: &[GeneratedStream]) {
    let panels = streams
        .iter()
        .map(|s| Panel {
            title: s.info.heatmap_title,
            grid: HeatmapGrid::render(&s.bits),
        })
        .collect();
    let mut app = App::new(panels);
    if let Err(e) = app.run() {
        super::fail(format!("TUI error: {e}"));
    }
}
