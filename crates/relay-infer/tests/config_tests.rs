use relay_infer::{Device, HandConfig, InferError, PalmModelSpec, PoseConfig};

#[test]
fn test_pose_defaults() {
    let config = PoseConfig::default();
    assert!(!config.static_image_mode);
    assert_eq!(config.model_complexity, 1);
    assert!(config.smooth_landmarks);
    assert_eq!(config.min_detection_confidence, 0.5);
    assert_eq!(config.min_tracking_confidence, 0.5);
    assert_eq!(config.model.input_size, 256);
    assert_eq!(config.model.landmark_count, 33);
    assert_eq!(config.model.values_per_landmark, 5);
    assert!(config.model.score_is_logit);
    assert!(config.validate().is_ok());
}

#[test]
fn test_hand_defaults() {
    let config = HandConfig::default();
    assert!(!config.static_image_mode);
    assert_eq!(config.max_num_hands, 2);
    assert_eq!(config.model_complexity, 1);
    assert_eq!(config.min_detection_confidence, 0.4);
    assert_eq!(config.min_tracking_confidence, 0.4);
    assert_eq!(config.model.input_size, 224);
    assert_eq!(config.model.landmark_count, 21);
    assert!(!config.model.score_is_logit);
    assert_eq!(config.palm, PalmModelSpec::default());
    assert_eq!(config.palm.input_size, 192);
    assert!(config.validate().is_ok());
}

#[test]
fn test_model_files_follow_complexity() {
    let files: Vec<_> = (0..3)
        .map(|c| {
            PoseConfig {
                model_complexity: c,
                ..PoseConfig::default()
            }
            .model_file()
            .unwrap()
        })
        .collect();
    assert_eq!(
        files,
        vec![
            "pose_landmark_lite.onnx",
            "pose_landmark_full.onnx",
            "pose_landmark_heavy.onnx"
        ]
    );

    let lite = HandConfig {
        model_complexity: 0,
        ..HandConfig::default()
    };
    assert_eq!(lite.model_file().unwrap(), "hand_landmark_lite.onnx");
    assert_eq!(lite.palm_model_file().unwrap(), "palm_detection_lite.onnx");
    assert_eq!(
        HandConfig::default().palm_model_file().unwrap(),
        "palm_detection_full.onnx"
    );
}

#[test]
fn test_invalid_values_are_rejected() {
    let pose = PoseConfig {
        min_detection_confidence: 1.5,
        ..PoseConfig::default()
    };
    assert!(matches!(pose.validate(), Err(InferError::Config(_))));

    let pose = PoseConfig {
        model_complexity: 3,
        ..PoseConfig::default()
    };
    assert!(matches!(pose.model_file(), Err(InferError::Config(_))));

    let hands = HandConfig {
        max_num_hands: 0,
        ..HandConfig::default()
    };
    assert!(matches!(hands.validate(), Err(InferError::Config(_))));

    let hands = HandConfig {
        model_complexity: 2,
        ..HandConfig::default()
    };
    assert!(matches!(hands.palm_model_file(), Err(InferError::Config(_))));
}

#[test]
fn test_partial_json_keeps_defaults() {
    let pose: PoseConfig =
        serde_json::from_str(r#"{"model_complexity": 2, "smooth_landmarks": false}"#).unwrap();
    assert_eq!(pose.model_complexity, 2);
    assert!(!pose.smooth_landmarks);
    assert_eq!(pose.min_detection_confidence, 0.5);

    let hands: HandConfig =
        serde_json::from_str(r#"{"max_num_hands": 4, "palm": {"input_size": 128}}"#).unwrap();
    assert_eq!(hands.max_num_hands, 4);
    assert_eq!(hands.palm.input_size, 128);
    assert_eq!(hands.palm.min_suppression_threshold, 0.3);
    assert_eq!(hands.model.input_size, 224);
}

#[test]
fn test_device_serde() {
    let cpu: Device = serde_json::from_str(r#"{"kind": "cpu"}"#).unwrap();
    assert_eq!(cpu, Device::Cpu);
    let cuda: Device = serde_json::from_str(r#"{"kind": "cuda", "device_id": 1}"#).unwrap();
    assert_eq!(cuda, Device::Cuda { device_id: 1 });
    assert_eq!(cuda.to_string(), "CUDA(device_id=1)");
}
