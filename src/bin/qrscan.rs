//! Decode a QR symbol from an image file and print what it says

use std::process::ExitCode;

use pixelqr::{DecodeOptions, decode_in_place};

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("usage: qrscan <image>");
        return ExitCode::from(2);
    };

    let img = match image::open(&path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            eprintln!("qrscan: {path}: {err}");
            return ExitCode::from(2);
        }
    };
    let (width, height) = (img.width() as usize, img.height() as usize);
    let mut pixels = img.into_raw();

    let Some(symbol) = decode_in_place(&mut pixels, width, height, &DecodeOptions::default())
    else {
        eprintln!("qrscan: no QR symbol found in {path}");
        return ExitCode::FAILURE;
    };

    println!("{}", symbol.text);
    println!(
        "version {}, ec {}, mask {}{}",
        symbol.version,
        symbol.ec_level,
        symbol.data_mask,
        if symbol.mirrored { ", mirrored" } else { "" },
    );
    let l = &symbol.location;
    println!(
        "corners ({:.1}, {:.1}) ({:.1}, {:.1}) ({:.1}, {:.1}) ({:.1}, {:.1})",
        l.top_left_corner.x,
        l.top_left_corner.y,
        l.top_right_corner.x,
        l.top_right_corner.y,
        l.bottom_right_corner.x,
        l.bottom_right_corner.y,
        l.bottom_left_corner.x,
        l.bottom_left_corner.y,
    );
    ExitCode::SUCCESS
}
