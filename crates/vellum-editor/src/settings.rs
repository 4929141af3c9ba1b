use engine_core::ColorLinPremul;
use vellum_config::VellumConfig;

/// Resolved editor settings. The engine never reads files or the
/// environment; callers build this from a [`VellumConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub hit_radius: f32,
    pub flatten_tolerance: f32,
    pub selection_color: ColorLinPremul,
    pub selection_handle_size: f32,
    pub control_point_size: f32,
    pub anchor_color: ColorLinPremul,
    pub control_color: ColorLinPremul,
    pub default_font_size: f32,
    pub line_height_factor: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from(&VellumConfig::default())
    }
}

fn color([r, g, b, a]: [f32; 4]) -> ColorLinPremul {
    ColorLinPremul::from_srgb_f32(r, g, b, a)
}

impl From<&VellumConfig> for EditorSettings {
    fn from(config: &VellumConfig) -> Self {
        Self {
            hit_radius: config.interaction.hit_radius,
            flatten_tolerance: config.interaction.flatten_tolerance,
            selection_color: color(config.rendering.selection_color),
            selection_handle_size: config.rendering.selection_handle_size,
            control_point_size: config.rendering.control_point_size,
            anchor_color: color(config.rendering.anchor_color),
            control_color: color(config.rendering.control_color),
            default_font_size: config.text.default_font_size,
            line_height_factor: config.text.line_height_factor,
        }
    }
}
