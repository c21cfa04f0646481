#![no_main]

use archive::{Limits, Pak, Wad};
use assets::{expand, image_from_lump, AssetLimits, Bsp, Mdl, Palette, Spr};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = AssetLimits::for_testing();
    let palette = Palette::greyscale();

    if let Ok(bsp) = Bsp::parse_with_limits(data, &limits) {
        let _ = bsp.geometry();
        for index in 0..bsp.miptex().len() {
            if let Ok(image) = bsp.miptex_image(index) {
                let _ = expand(&image, &palette, Some(4));
            }
        }
    }
    if let Ok(mdl) = Mdl::parse_with_limits(data, &limits) {
        let _ = mdl.uvs();
        let _ = mdl.blend_frames(0.5);
    }
    if let Ok(spr) = Spr::parse_with_limits(data, &limits) {
        if let Ok(image) = spr.frame_image(0) {
            let _ = expand(&image, &palette, None);
        }
    }
    if let Ok(image) = image_from_lump("lump", data, None) {
        let _ = expand(&image, &palette, None);
    }
    if let Ok(pak) = Pak::parse_with_limits(data, &Limits::for_testing()) {
        for entry in pak.entries() {
            let _ = pak.entry_data(entry);
        }
    }
    if let Ok(wad) = Wad::parse_with_limits(data, &Limits::for_testing()) {
        for entry in wad.entries() {
            let _ = wad.entry_data(entry);
        }
    }
});
