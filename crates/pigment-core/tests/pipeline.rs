use pigment_core::codec::graybit7::{self, expand_gray};
use pigment_core::color::ContrastCheck;
use pigment_core::filter::convolve;
use pigment_core::layers::{BlendMode, LayerSource, LayerStack};
use pigment_core::{
    EngineConfig, ImageFormat, Kernel, LayerError, PixelBuffer, ResizeMethod, decode_image,
    encode_png, resize, sample_color,
};

fn gray_ramp(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let g = ((x + y) * 255 / (width + height - 2)) as u8;
        [g, g, g, 255]
    })
}

#[test]
fn graybit7_file_flows_through_filter_and_composite() {
    let bytes = graybit7::encode(&gray_ramp(32, 24), false).unwrap();
    let (buffer, info) = decode_image(&bytes, ImageFormat::from_extension("GB7")).unwrap();
    assert_eq!(info.format, ImageFormat::GrayBit7);
    assert_eq!((info.width, info.height, info.depth), (32, 24, 7));
    assert_eq!(info.byte_len, 12 + 32 * 24);

    let blurred = convolve(&buffer, &Kernel::BOX_BLUR);
    assert_eq!(blurred.dimensions(), buffer.dimensions());

    let mut stack = LayerStack::new(blurred.clone(), EngineConfig::builtin());
    let composed = stack.composite(1.0);
    assert_eq!(composed.image, blurred);

    // A white multiply layer leaves the image alone.
    let white = stack.add_layer(LayerSource::Color([255, 255, 255, 255])).unwrap();
    stack.set_blend_mode(white, BlendMode::Multiply).unwrap();
    let composed = stack.composite(2.0);
    assert_eq!(composed.image.dimensions(), (800, 600));
    assert_eq!(composed.image.pixel(5, 5), blurred.pixel(5, 5));
    assert_eq!((composed.display_size.width, composed.display_size.height), (1600, 1200));
}

#[test]
fn graybit7_mask_becomes_alpha() {
    let src = PixelBuffer::from_fn(4, 1, |x, _| {
        [(x * 80) as u8, 0, 0, if x % 2 == 0 { 255 } else { 0 }]
    });
    let bytes = graybit7::encode(&src, true).unwrap();
    let (buffer, info) = decode_image(&bytes, ImageFormat::GrayBit7).unwrap();
    assert_eq!(info.depth, 8);
    for x in 0..4 {
        let g = expand_gray((x * 80) as u8 >> 1);
        let a = if x % 2 == 0 { 255 } else { 0 };
        assert_eq!(buffer.pixel(x, 0), Some([g, g, g, a]));
    }
}

#[test]
fn png_round_trip_reports_depth() {
    let color = PixelBuffer::from_fn(12, 12, |x, y| [x as u8 * 20, y as u8 * 20, 90, 255]);
    let png = encode_png(&color).unwrap();
    let (decoded, info) = decode_image(&png, ImageFormat::from_extension("png")).unwrap();
    assert_eq!(decoded, color);
    assert_eq!(info.format, ImageFormat::Generic);
    assert_eq!(info.depth, 24);

    let gray = encode_png(&gray_ramp(12, 12)).unwrap();
    assert_eq!(decode_image(&gray, ImageFormat::Generic).unwrap().1.depth, 8);
}

#[test]
fn malformed_input_is_rejected_without_panicking() {
    assert!(decode_image(&[0u8; 5], ImageFormat::GrayBit7).is_err());
    assert!(decode_image(b"not an image at all", ImageFormat::Generic).is_err());
}

#[test]
fn resize_then_sample_and_check_contrast() {
    let config = EngineConfig::builtin();
    let src = PixelBuffer::from_fn(4, 4, |x, _| {
        if x < 2 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }
    });
    let big = resize(&src, 8, 8, ResizeMethod::Nearest, config.max_dimension).unwrap();
    assert!(resize(&src, 10_001, 8, ResizeMethod::Nearest, config.max_dimension).is_err());

    let dark = sample_color(&big, 0, 0).unwrap();
    let light = sample_color(&big, 7, 7).unwrap();
    assert_eq!(dark.hex, "#000000");
    assert_eq!(light.hex, "#ffffff");

    let check = ContrastCheck::evaluate(dark.rgb, light.rgb, config.contrast_warning_threshold);
    assert!((check.ratio - 21.0).abs() < 0.01);
    assert!(!check.warning);
    assert!(sample_color(&big, 8, 0).is_err());
}

#[test]
fn sixth_layer_is_rejected() {
    let mut stack = LayerStack::new(PixelBuffer::new(2, 2), EngineConfig::builtin());
    for _ in 0..4 {
        stack.add_layer(LayerSource::Image(PixelBuffer::new(2, 2))).unwrap();
    }
    assert_eq!(stack.len(), 5);
    let err = stack.add_layer(LayerSource::Empty).unwrap_err();
    assert_eq!(err, LayerError::LimitReached { limit: 5 });
    assert_eq!(stack.len(), 5);
}
