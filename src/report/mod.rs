/// Report output: SVG charts and the assembled HTML document.

pub mod charts;
pub mod render;
