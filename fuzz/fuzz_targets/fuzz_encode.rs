#![no_main]
use libfuzzer_sys::fuzz_target;
use zenfbdump::*;

const FORMATS: [TargetFormat; 6] = [
    TargetFormat::Pbm,
    TargetFormat::Pgm,
    TargetFormat::Ppm,
    TargetFormat::BmpBilevel,
    TargetFormat::BmpGray,
    TargetFormat::BmpTrueColor,
];

fuzz_target!(|data: &[u8]| {
    // 14 header bytes describe the layout, the rest is framebuffer memory
    let Some((head, source)) = data.split_first_chunk::<14>() else {
        return;
    };
    let layout = PixelLayout::new(
        u32::from(head[0] % 64),
        u32::from(head[1] % 64),
        u32::from(head[2] % 40),
        u32::from(head[3]),
    )
    .with_offsets(u32::from(head[4] % 16), u32::from(head[5] % 4))
    .with_channels(
        Bitfield::new(head[6] % 40, head[7] % 12),
        Bitfield::new(head[8] % 40, head[9] % 12),
        Bitfield::new(head[10] % 40, head[11] % 12),
    );
    let format = FORMATS[usize::from(head[12]) % FORMATS.len()];
    let workers = usize::from(head[13] % 9);

    let model = match Visual::from_raw(u32::from(head[12] % 7)) {
        Ok(visual) if visual.is_mono() => ColorModel::Mono {
            black_is_zero: visual == Visual::Mono10,
        },
        _ => ColorModel::Table(ColorTable::ramp(&layout)),
    };

    // Must never panic; serial and banded output must agree
    let serial = encode(layout, &model, source, format, enough::Unstoppable);
    let banded = EncodeRequest::new(layout, &model, source)
        .format(format)
        .parallelism(workers)
        .encode(enough::Unstoppable);
    match (serial, banded) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.as_bytes(), b.as_bytes(), "banded output differs");
            let stride = format.row_stride(layout.width).unwrap();
            assert_eq!(a.payload().len(), stride * layout.height as usize);
        }
        (Err(_), Err(_)) => {}
        _ => panic!("serial and banded encode disagree on success"),
    }
});
