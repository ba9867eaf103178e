use camoverlay::OverlayConfig;

#[test]
fn minimal_config_parses_with_defaults() {
    let cfg: OverlayConfig =
        serde_json::from_str(r#"{"webcam_image_path": "webcam.jpg"}"#).unwrap();
    cfg.validate().unwrap();
}

#[test]
fn full_config_parses_and_validates() {
    let cfg: OverlayConfig = serde_json::from_str(
        r#"{
            "output_scale": 75,
            "webcam_image_path": "webcam.jpg",
            "watermark_enabled": true,
            "watermark_image_path": "watermark.png",
            "watermark_position": "topright",
            "downtime_enabled": true,
            "downtime_image_path": "offline.png",
            "downtime_position": "center",
            "downtime_start": "20:00:00",
            "downtime_end": "08:00:00",
            "info_text_enabled": true,
            "info_text_content": " (c) example.com",
            "info_text_font_path": "vera.ttf",
            "info_text_font_size_px": 9,
            "info_text_x": 3,
            "info_text_y": 178,
            "info_text_color": [255, 255, 255],
            "info_text_border_enabled": true,
            "info_text_border_color": [50, 50, 50]
        }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
}

#[test]
fn unknown_position_token_lists_the_valid_ones() {
    let err = serde_json::from_str::<OverlayConfig>(
        r#"{"webcam_image_path": "w.jpg", "watermark_position": "upperleft"}"#,
    )
    .unwrap_err()
    .to_string();
    for token in ["topleft", "topright", "bottomleft", "bottomright", "center"] {
        assert!(err.contains(token), "missing {token} in: {err}");
    }
}

#[test]
fn malformed_time_is_rejected_at_parse_time() {
    let err = serde_json::from_str::<OverlayConfig>(
        r#"{"webcam_image_path": "w.jpg", "downtime_start": "8:00:00"}"#,
    )
    .unwrap_err()
    .to_string();
    assert!(err.contains("HH:MM:SS"), "{err}");
}

#[test]
fn malformed_color_is_rejected_at_parse_time() {
    let short = serde_json::from_str::<OverlayConfig>(
        r#"{"webcam_image_path": "w.jpg", "info_text_color": [255, 255]}"#,
    )
    .unwrap_err()
    .to_string();
    assert!(short.contains("3 components"), "{short}");

    let out_of_range = serde_json::from_str::<OverlayConfig>(
        r#"{"webcam_image_path": "w.jpg", "info_text_border_color": [0, 0, 300]}"#,
    )
    .unwrap_err()
    .to_string();
    assert!(out_of_range.contains("0-255"), "{out_of_range}");
}

#[test]
fn config_round_trips_through_json() {
    let cfg: OverlayConfig = serde_json::from_str(
        r#"{
            "webcam_image_path": "webcam.jpg",
            "downtime_start": "22:00:00",
            "info_text_color": [1, 2, 3]
        }"#,
    )
    .unwrap();

    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"22:00:00\""), "{json}");
    assert!(json.contains("[1,2,3]"), "{json}");

    let back: OverlayConfig = serde_json::from_str(&json).unwrap();
    back.validate().unwrap();
}
