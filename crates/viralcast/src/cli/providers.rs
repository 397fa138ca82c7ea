//! `viralcast providers` handler.

use viralcast::{ImageProvider, TextProvider, ViralcastConfig, providers};

/// Prints every provider with its availability, in routing order.
pub fn list_providers(config: &ViralcastConfig) {
    let mark = |available: bool| if available { "available" } else { "not configured" };

    println!("Text providers:");
    for provider in providers::text_providers(config) {
        println!("  {:<24} {}", provider.name(), mark(provider.is_available()));
    }

    println!("Image generators:");
    for generator in providers::image_providers(config) {
        let fallback = if generator.is_always_available_fallback() {
            " (fallback)"
        } else {
            ""
        };
        println!(
            "  {:<24} {}{}",
            generator.name(),
            mark(generator.is_available()),
            fallback
        );
    }
}
