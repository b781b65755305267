//! # Play a stream on a DLNA renderer
//!
//! Fetches a renderer's device descriptor, negotiates codecs and points the
//! renderer at an HTTP audio stream.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example play_stream -- <descriptor url> <stream url> [title]
//! ```
//!
//! Logging follows `DLNA_LOG_MODE` ("development" or "debug"); without it
//! the example logs at info level. `DLNA_LOG_MODE=debug` shows every SOAP
//! exchange.

use std::env;
use std::process::ExitCode;

use dlna_api::logging::{init_logging, init_logging_from_env, is_initialized, LoggingMode};
use dlna_api::{MediaRenderer, TrackMetadata};
use dlna_discovery::DescriptorFetcher;

fn main() -> ExitCode {
    if let Err(e) = init_logging_from_env() {
        eprintln!("Logging disabled: {}", e);
    }
    if !is_initialized() {
        if let Err(e) = init_logging(LoggingMode::Development) {
            eprintln!("Logging disabled: {}", e);
        }
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let (descriptor_url, stream_url) = match (args.first(), args.get(1)) {
        (Some(descriptor), Some(stream)) => (descriptor, stream),
        _ => {
            eprintln!("usage: play_stream <descriptor url> <stream url> [title]");
            return ExitCode::FAILURE;
        }
    };

    let fetcher = match DescriptorFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Could not create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let device = match fetcher.from_url(descriptor_url) {
        Ok(device) => device,
        Err(e) => {
            eprintln!("Could not read descriptor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Found {} ({})", device.label(), device.udn);

    let mut renderer = MediaRenderer::new(device);
    if let Err(e) = renderer.controller_mut().activate() {
        eprintln!("Renderer not usable: {}", e);
        return ExitCode::FAILURE;
    }

    for codec in &renderer.device().codecs {
        println!("  codec {} (priority {})", codec.mime_type, codec.priority);
    }

    let mut track = TrackMetadata::new();
    if let Some(title) = args.get(2) {
        track = track.with_title(title.clone());
    }

    let status = renderer.play_stream(stream_url, None, &track);
    println!("play_stream returned {}", status);

    if status == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
