//! Random playlist generator.
//!
//! Produces a playlist document with a configurable number of albums for
//! exercising the viewer: `playlistgen <output.json> [albums] [seed]`.

use anyhow::{Context, Result};
use playtree::{PlayTree, write_playlist};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

const ARTISTS: &[&str] = &[
    "The Silver Owls",
    "Karla Voss",
    "Midnight Freight",
    "Glass Harbor",
    "Juniper Station",
    "Low Orbit Choir",
    "The Paper Lanterns",
    "Ada & The Relays",
];

const ALBUM_WORDS: &[&str] = &[
    "Echoes", "Harbor", "Meridian", "Static", "Aurora", "Pressure", "Vagabond", "Tides",
    "Copper", "Night", "Sirens", "Maps",
];

const TRACK_WORDS: &[&str] = &[
    "Wire", "Sleeper", "Glacier", "Arcade", "Motor", "Ghost", "Signal", "Window", "Harvest",
    "Static", "Ribbon", "Polar", "Ember", "Drift", "Canyon", "Parade",
];

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.gen_range(0..words.len())]
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let output = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "playlist.json".to_string());
    let albums: usize = args
        .get(2)
        .map(|s| s.parse().context("album count must be a number"))
        .transpose()?
        .unwrap_or(12);
    let seed: u64 = args
        .get(3)
        .map(|s| s.parse().context("seed must be a number"))
        .transpose()?
        .unwrap_or(42);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = PlayTree::new();
    let mut tracks = 0usize;

    for _ in 0..albums {
        let artist = pick(&mut rng, ARTISTS);
        let album = format!("{} - {} {}", artist, pick(&mut rng, ALBUM_WORDS), pick(&mut rng, ALBUM_WORDS));
        let album_id = tree.add_node(None, album);
        tree.set_expanded(album_id, rng.gen_bool(0.5));

        for n in 1..=rng.gen_range(3..=12) {
            let minutes = rng.gen_range(2..=7);
            let seconds = rng.gen_range(0..60);
            let title = format!(
                "{:02}. {} {} ({}:{:02})",
                n,
                pick(&mut rng, TRACK_WORDS),
                pick(&mut rng, TRACK_WORDS),
                minutes,
                seconds
            );
            tree.add_node(Some(album_id), title);
            tracks += 1;
        }
    }

    write_playlist(&output, &tree)?;
    println!("Wrote {} albums / {} tracks to {}", albums, tracks, output);
    Ok(())
}
