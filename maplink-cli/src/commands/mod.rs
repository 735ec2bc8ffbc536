//! CLI subcommand implementations.

use std::process::ExitCode;

use console::style;

use maplink::service::BasemapService;

/// Shows service enablement, font reachability, the resolved glyph URL and
/// the catalogue counts.
pub async fn status(service: &BasemapService) -> ExitCode {
    let settings = service.settings();

    println!("Service origin: {}", settings.service_origin);
    println!(
        "Enabled:        {}",
        if settings.enabled {
            style("yes").green()
        } else {
            style("no").yellow()
        }
    );

    let fonts = service.can_access_fonts().await;
    println!(
        "Font endpoint:  {}",
        if fonts {
            style("reachable").green()
        } else {
            style("unreachable").red()
        }
    );
    println!("Glyph URL:      {}", service.glyph_url().await);

    match service.file_layers().await {
        Ok(layers) => println!("File layers:    {}", layers.len()),
        Err(e) => println!("File layers:    {}", style(format!("error: {}", e)).red()),
    }
    match service.tile_services().await {
        Ok(services) => println!("Tile services:  {}", services.len()),
        Err(e) => println!("Tile services:  {}", style(format!("error: {}", e)).red()),
    }

    ExitCode::SUCCESS
}

/// Probes the font endpoint once; exit code 0 when reachable.
pub async fn probe(service: &BasemapService) -> ExitCode {
    if service.can_access_fonts().await {
        println!("{}", style("Font endpoint reachable").green());
        ExitCode::SUCCESS
    } else {
        println!("{}", style("Font endpoint unreachable").red());
        ExitCode::FAILURE
    }
}

/// Prints the glyph URL template clients should use.
pub async fn glyphs(service: &BasemapService) -> ExitCode {
    println!("{}", service.glyph_url().await);
    ExitCode::SUCCESS
}
