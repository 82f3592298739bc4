mod chart;
mod markdown;

pub use chart::{slug, ChartRenderer, NoCharts, PngCharts};
pub use markdown::{
    escape_cell, language_bars, render_commits, render_diff, render_languages, render_overview, render_pulse,
    render_summary, sparkline, top_languages, NO_ACTIVITY,
};
