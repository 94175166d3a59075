//! Property tests: band-parallel output equals serial output, payload sizes.

use enough::Unstoppable;
use proptest::prelude::*;
use zenfbdump::*;

const COLOR_FORMATS: [TargetFormat; 4] = [
    TargetFormat::Pgm,
    TargetFormat::Ppm,
    TargetFormat::BmpGray,
    TargetFormat::BmpTrueColor,
];

/// Random packed color layout plus a source buffer that covers it.
fn color_surface() -> impl Strategy<Value = (PixelLayout, Vec<u8>)> {
    (
        1u32..=24,
        1u32..=40,
        prop::sample::select(vec![8u32, 16, 24, 32]),
        0u32..=3,
        0u32..=4,
        0u32..=3,
        (0u8..=8, 0u8..=8, 0u8..=8),
    )
        .prop_flat_map(|(width, height, bpp, x_off, slack, y_off, lengths)| {
            let bytes = bpp.div_ceil(8);
            let stride = (width + x_off) * bytes + slack;
            let bits = bytes * 8;
            let field = move |length: u8| {
                let max_offset = (bits - u32::from(length)) as u8;
                (0u8..=max_offset).prop_map(move |offset| Bitfield::new(offset, length))
            };
            let len = (stride * (height + y_off)) as usize;
            (
                field(lengths.0),
                field(lengths.1),
                field(lengths.2),
                prop::collection::vec(any::<u8>(), len..=len),
            )
                .prop_map(move |(red, green, blue, source)| {
                    let layout = PixelLayout::new(width, height, bpp, stride)
                        .with_channels(red, green, blue)
                        .with_offsets(x_off, y_off);
                    (layout, source)
                })
        })
}

fn mono_surface() -> impl Strategy<Value = (PixelLayout, Vec<u8>)> {
    (1u32..=64, 1u32..=40, 0u32..=2, 0u32..=3).prop_flat_map(|(width, height, x_bytes, y_off)| {
        let stride = width.div_ceil(8) + x_bytes;
        let len = (stride * (height + y_off)) as usize;
        prop::collection::vec(any::<u8>(), len..=len).prop_map(move |source| {
            let layout = PixelLayout::new(width, height, 1, stride).with_offsets(x_bytes * 8, y_off);
            (layout, source)
        })
    })
}

proptest! {
    /// Property: every worker count yields the serial bytes.
    #[test]
    fn prop_parallel_matches_serial_color((layout, source) in color_surface()) {
        let model = ColorModel::for_visual(Visual::TrueColor, &layout, None).unwrap();
        for format in COLOR_FORMATS {
            let serial = EncodeRequest::new(layout, &model, &source)
                .format(format)
                .encode(Unstoppable)
                .unwrap();
            for workers in [2, 8] {
                let parallel = EncodeRequest::new(layout, &model, &source)
                    .format(format)
                    .parallelism(workers)
                    .encode(Unstoppable)
                    .unwrap();
                prop_assert_eq!(serial.as_bytes(), parallel.as_bytes());
            }
            let stride = format.row_stride(layout.width).unwrap();
            prop_assert_eq!(serial.payload().len(), stride * layout.height as usize);
        }
    }

    /// Property: same for 1 bpp sources, both polarities.
    #[test]
    fn prop_parallel_matches_serial_mono(
        (layout, source) in mono_surface(),
        black_is_zero in any::<bool>(),
    ) {
        let model = ColorModel::Mono { black_is_zero };
        for format in [TargetFormat::Pbm, TargetFormat::BmpBilevel] {
            let serial = encode(layout, &model, &source, format, Unstoppable).unwrap();
            for workers in [2, 8] {
                let parallel = EncodeRequest::new(layout, &model, &source)
                    .format(format)
                    .parallelism(workers)
                    .encode(Unstoppable)
                    .unwrap();
                prop_assert_eq!(serial.as_bytes(), parallel.as_bytes());
            }
        }
    }

    /// Property: encoding a bilevel row twice restores it.
    #[test]
    fn prop_bilevel_involution(row in prop::collection::vec(any::<u8>(), 1..64)) {
        let encoder = Bilevel { black_is_zero: false };
        let mut once = vec![0u8; row.len()];
        let mut twice = vec![0u8; row.len()];
        encoder.encode_row(&row, &mut once);
        encoder.encode_row(&once, &mut twice);
        prop_assert_eq!(row, twice);
    }

    /// Property: gray pixels keep their value through luma.
    #[test]
    fn prop_luma_of_gray_is_identity(v in any::<u8>()) {
        prop_assert_eq!(luma(v, v, v), v);
    }
}

#[test]
fn uneven_heights_cover_remainder_rows() {
    let layout = PixelLayout::xrgb8888(3, 13);
    let model = ColorModel::for_visual(Visual::TrueColor, &layout, None).unwrap();
    let source: Vec<u8> = (0..3 * 13 * 4).map(|i| (i * 7) as u8).collect();
    let serial = encode(layout, &model, &source, TargetFormat::Ppm, Unstoppable).unwrap();
    for workers in [1, 2, 8, 13, 32] {
        let parallel = EncodeRequest::new(layout, &model, &source)
            .parallelism(workers)
            .encode(Unstoppable)
            .unwrap();
        assert_eq!(serial.as_bytes(), parallel.as_bytes(), "{workers} workers");
    }
}

#[cfg(feature = "std")]
#[test]
fn available_parallelism_matches_serial() {
    let layout = PixelLayout::rgb565(17, 9);
    let model = ColorModel::for_visual(Visual::TrueColor, &layout, None).unwrap();
    let source: Vec<u8> = (0..17 * 9 * 2).map(|i| (i * 13) as u8).collect();
    let serial = encode(layout, &model, &source, TargetFormat::BmpGray, Unstoppable).unwrap();
    let parallel = EncodeRequest::new(layout, &model, &source)
        .format(TargetFormat::BmpGray)
        .available_parallelism()
        .encode(Unstoppable)
        .unwrap();
    assert_eq!(serial.as_bytes(), parallel.as_bytes());
}
