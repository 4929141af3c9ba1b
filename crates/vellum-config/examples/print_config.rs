/// Example program to print the loaded configuration
///
/// Run with: cargo run -p vellum-config --example print_config

fn main() {
    let config = vellum_config::VellumConfig::load();

    println!("=== Vellum Configuration ===\n");

    println!("Interaction:");
    println!("  Hit Radius: {}", config.interaction.hit_radius);
    println!("  Flatten Tolerance: {}", config.interaction.flatten_tolerance);
    println!();

    println!("Rendering:");
    println!("  Selection Color: {:?}", config.rendering.selection_color);
    println!("  Selection Handle Size: {}", config.rendering.selection_handle_size);
    println!("  Control Point Size: {}", config.rendering.control_point_size);
    println!("  Anchor Color: {:?}", config.rendering.anchor_color);
    println!("  Control Color: {:?}", config.rendering.control_color);
    println!();

    println!("Text:");
    println!("  Default Font Size: {}", config.text.default_font_size);
    println!("  Line Height Factor: {}", config.text.line_height_factor);
    println!();

    println!("Logging:");
    println!("  Filter: {:?}", config.logging.filter);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
