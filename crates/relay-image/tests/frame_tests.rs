use relay_image::{ChannelOrder, ImageError, frame_from_samples, frame_size, to_rgb};

#[test]
fn test_frame_from_samples_shape() {
    let frame = frame_from_samples(4, 2, vec![0; 24]).unwrap();
    assert_eq!(frame.shape, vec![2, 4, 3]);
}

#[test]
fn test_frame_from_samples_rejects_short_data() {
    let err = frame_from_samples(4, 2, vec![0; 23]).unwrap_err();
    assert!(matches!(
        err,
        ImageError::SampleCount {
            expected: 24,
            got: 23,
            ..
        }
    ));
}

#[test]
fn test_frame_from_samples_rejects_long_data() {
    assert!(frame_from_samples(1, 1, vec![0; 4]).is_err());
}

#[test]
fn test_frame_from_samples_rejects_zero_dimension() {
    let err = frame_from_samples(0, 10, Vec::new()).unwrap_err();
    assert!(matches!(err, ImageError::ZeroDimension { width: 0, height: 10 }));
}

#[test]
fn test_frame_size_overflow() {
    assert!(matches!(
        frame_size(usize::MAX, 2),
        Err(ImageError::Overflow { .. })
    ));
    assert_eq!(frame_size(1280, 720).unwrap(), 1280 * 720 * 3);
}

#[test]
fn test_to_rgb_swaps_bgr() {
    let mut frame = frame_from_samples(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    to_rgb(&mut frame, ChannelOrder::Bgr);
    assert_eq!(frame.data, vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn test_to_rgb_keeps_rgb() {
    let mut frame = frame_from_samples(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    to_rgb(&mut frame, ChannelOrder::Rgb);
    assert_eq!(frame.data, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_channel_order_parsing() {
    assert_eq!("BGR".parse::<ChannelOrder>().unwrap(), ChannelOrder::Bgr);
    assert_eq!(" rgb ".parse::<ChannelOrder>().unwrap(), ChannelOrder::Rgb);
    assert!("rgba".parse::<ChannelOrder>().is_err());

    let order: ChannelOrder = serde_json::from_str("\"bgr\"").unwrap();
    assert_eq!(order, ChannelOrder::Bgr);
}
