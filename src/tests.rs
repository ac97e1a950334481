#[cfg(test)]
mod layout_tests {
    use crate::layout::{arc_start, layout_text, ArcDirection, LayoutStrategy, TextPath};
    use euclid::default::Point2D;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn top_arc(span: f32) -> TextPath {
        TextPath::Arc {
            center: Point2D::new(100.0, 100.0),
            radius_x: 50.0,
            radius_y: 40.0,
            mid_angle: -FRAC_PI_2,
            span,
            direction: ArcDirection::Clockwise,
        }
    }

    #[test]
    fn test_equal_angle_slots() {
        let span = 270f32.to_radians();
        let placements = layout_text("印章绘制公司", &top_arc(span), LayoutStrategy::EqualAngle, &[]);
        assert_eq!(placements.len(), 6);

        let start = arc_start(-FRAC_PI_2, span, ArcDirection::Clockwise);
        for (i, placement) in placements.iter().enumerate() {
            let expected = start + span / 6.0 * (i as f32 + 0.5);
            assert!((placement.slot - expected).abs() < 1e-5, "slot {i}");
            assert!((placement.rotation - (expected + FRAC_PI_2)).abs() < 1e-5);
        }
        let gap = placements[1].slot - placements[0].slot;
        assert!((gap - 45f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_middle_character_sits_at_span_midpoint() {
        let span = PI;
        let placements = layout_text("ABCDE", &top_arc(span), LayoutStrategy::EqualAngle, &[]);
        let start = arc_start(-FRAC_PI_2, span, ArcDirection::Clockwise);
        assert!((placements[2].slot - (start + span / 2.0)).abs() < 1e-5);
        // Top of the ellipse, upright
        assert!((placements[2].position.x - 100.0).abs() < 1e-3);
        assert!((placements[2].position.y - 60.0).abs() < 1e-3);
        assert!(placements[2].rotation.abs() < 1e-5);
    }

    #[test]
    fn test_single_character_at_midpoint() {
        let placements = layout_text("章", &top_arc(PI), LayoutStrategy::EqualAngle, &[]);
        assert_eq!(placements.len(), 1);
        assert!((placements[0].slot + FRAC_PI_2).abs() < 1e-5);

        let width_based = layout_text(
            "章",
            &top_arc(PI),
            LayoutStrategy::EqualWidth { letter_spacing: 3.0 },
            &[12.0],
        );
        assert!((width_based[0].slot + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_places_nothing() {
        assert!(layout_text("", &top_arc(PI), LayoutStrategy::EqualAngle, &[]).is_empty());
    }

    #[test]
    fn test_counter_clockwise_reads_left_to_right() {
        let path = TextPath::Arc {
            center: Point2D::new(0.0, 0.0),
            radius_x: 50.0,
            radius_y: 50.0,
            mid_angle: FRAC_PI_2,
            span: PI / 3.0,
            direction: ArcDirection::CounterClockwise,
        };
        let placements = layout_text("1234", &path, LayoutStrategy::EqualAngle, &[]);
        for pair in placements.windows(2) {
            assert!(pair[0].position.x < pair[1].position.x);
        }
        // Bottom of the circle, glyphs upright
        assert!(placements.iter().all(|p| p.position.y > 0.0));
        let mid_rotation = (placements[1].rotation + placements[2].rotation) / 2.0;
        assert!(mid_rotation.abs() < 1e-5);
    }

    #[test]
    fn test_equal_width_on_line() {
        let path = TextPath::Line {
            center: Point2D::new(10.0, 5.0),
            span: 0.0,
        };
        let placements = layout_text(
            "iMi",
            &path,
            LayoutStrategy::EqualWidth { letter_spacing: 2.0 },
            &[4.0, 10.0, 4.0],
        );
        let xs: Vec<f32> = placements.iter().map(|p| p.position.x).collect();
        // 22 px total, centred on x = 10
        assert_eq!(xs, vec![10.0 - 9.0, 10.0, 10.0 + 9.0]);
        assert!(placements.iter().all(|p| p.position.y == 5.0 && p.rotation == 0.0));
    }

    #[test]
    fn test_equal_width_on_arc_follows_advances() {
        let path = TextPath::Arc {
            center: Point2D::new(0.0, 0.0),
            radius_x: 100.0,
            radius_y: 100.0,
            mid_angle: -FRAC_PI_2,
            span: PI,
            direction: ArcDirection::Clockwise,
        };
        let placements = layout_text(
            "WiW",
            &path,
            LayoutStrategy::EqualWidth { letter_spacing: 0.0 },
            &[20.0, 4.0, 20.0],
        );
        let narrow_gap = placements[1].slot - placements[0].slot;
        // (20/2 + 4/2) / 100 radians between W and i
        assert!((narrow_gap - 0.12).abs() < 1e-5);
        assert!((placements[1].slot + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_equal_cells_on_line() {
        let path = TextPath::Line {
            center: Point2D::new(0.0, 0.0),
            span: 40.0,
        };
        let placements = layout_text("0000", &path, LayoutStrategy::EqualAngle, &[]);
        let xs: Vec<f32> = placements.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![-15.0, -5.0, 5.0, 15.0]);
    }
}

#[cfg(test)]
mod config_tests {
    use crate::color_utils::{parse_color, InkMatcher};
    use crate::models::StampConfig;
    use crate::presets::Preset;
    use crate::units::UnitScale;
    use crate::StampError;

    #[test]
    fn test_unit_scale_reference() {
        let scale = UnitScale::default();
        assert_eq!(scale.pixels_per_mm(), 4.0);
        assert_eq!(scale.mm_to_px(40.0), 160.0);
        assert_eq!(scale.px_to_mm(160.0), 40.0);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0000").unwrap(), (255, 0, 0, 255));
        assert_eq!(parse_color("00ff00").unwrap(), (0, 255, 0, 255));
        assert_eq!(parse_color("#ff000080").unwrap(), (255, 0, 0, 128));
        assert_eq!(parse_color("Blue").unwrap(), (0, 0, 255, 255));
        assert_eq!(parse_color("transparent").unwrap(), (0, 0, 0, 0));
        assert!(matches!(parse_color("#zz0000"), Err(StampError::InvalidColor(_))));
        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn test_multibyte_color_is_rejected() {
        // Eight bytes, but the slice boundaries fall inside a character
        assert!(matches!(parse_color("#abcd中x"), Err(StampError::InvalidColor(_))));
        assert!(matches!(parse_color("红色"), Err(StampError::InvalidColor(_))));

        let mut config = StampConfig::default();
        config.primary_color = "#abcd中x".to_string();
        assert!(matches!(config.validate(), Err(StampError::InvalidColor(_))));
    }

    #[test]
    fn test_ink_matcher() {
        let red = InkMatcher::new(255, 0, 0);
        assert!(red.matches(&[255, 0, 0, 255]));
        assert!(red.matches(&[210, 40, 30, 255]));
        assert!(!red.matches(&[255, 255, 255, 255]));
        assert!(!red.matches(&[0, 0, 0, 0]));
        // Half-transparent ink is not aged
        assert!(!red.matches(&[128, 0, 0, 128]));

        let blue = InkMatcher::from_color_str("#0000ff").unwrap();
        assert!(blue.matches(&[0, 0, 255, 255]));
        assert!(!blue.matches(&[255, 0, 0, 255]));
    }

    #[test]
    fn test_default_and_presets_validate() {
        StampConfig::default().validate().unwrap();
        for preset in Preset::ALL {
            preset.config().validate().unwrap();
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("round".parse::<Preset>().is_err());
        assert_eq!(Preset::ALL.len(), 5);

        assert!(Preset::Contract.config().inner_circle.show_inner_circle);
        assert!(!Preset::Official.config().inner_circle.show_inner_circle);
        let financial = Preset::Financial.config();
        assert_eq!((financial.width, financial.border_width), (38.0, 0.8));
        let legal = "Legal".parse::<Preset>().unwrap().config();
        assert_eq!((legal.width, legal.height, legal.border_width), (18.0, 18.0, 0.6));
    }

    #[test]
    fn test_validation_rejects_text_inside_out() {
        let mut config = StampConfig::default();
        config.width = 10.0;
        config.height = 10.0;
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "companyName.fontSizeMM", .. })
        ));

        // Without a title the small seal is fine
        config.company_name.text.clear();
        config.validate().unwrap();

        config.code.text = "123".to_string();
        config.code.font_size_mm = 9.0;
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "code.fontSizeMM", .. })
        ));
        config.code.font_size_mm = 1.2;
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_oversized_pattern_and_ring() {
        let mut config = StampConfig::default();
        config.security_pattern.count = 1_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "securityPattern.count", .. })
        ));
        config.security_pattern.count = 500;
        config.validate().unwrap();

        let mut config = StampConfig::default();
        config.company_name.text.clear();
        config.width = 5.0;
        config.height = 5.0;
        config.border_width = 1.0;
        config.inner_circle.show_inner_circle = true;
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "innerCircle.showInnerCircle", .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_geometry() {
        let mut config = StampConfig::default();
        config.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "width", .. })
        ));

        let mut config = StampConfig::default();
        config.border_width = -1.0;
        assert!(config.validate().is_err());

        let mut config = StampConfig::default();
        config.company_name.compression = 0.0;
        assert!(config.validate().is_err());

        let mut config = StampConfig::default();
        config.primary_color = "not a color".to_string();
        assert!(matches!(config.validate(), Err(StampError::InvalidColor(_))));
    }

    #[test]
    fn test_validation_rejects_spans_over_full_turn() {
        let mut config = StampConfig::default();
        config.company_name.text = "一二三四五六七八九十".to_string();
        config.company_name.distribution_factor = Some(5.0);
        assert!(matches!(
            config.validate(),
            Err(StampError::InvalidConfig { field: "companyName", .. })
        ));

        config.company_name.distribution_factor = Some(20.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_json_uses_defaults_for_missing_fields() {
        let json = r#"{
            "width": 42,
            "companyName": { "text": "测试公司", "fontSizeMM": 5.0 },
            "securityPattern": { "enabled": false, "count": 8 }
        }"#;
        let config = StampConfig::from_json(json).unwrap();
        assert_eq!(config.width, 42.0);
        assert_eq!(config.height, 30.0);
        assert_eq!(config.company_name.text, "测试公司");
        assert_eq!(config.company_name.font_size_mm, 5.0);
        assert_eq!(config.company_name.compression, 1.0);
        assert!(!config.security_pattern.open_security_pattern);
        assert_eq!(config.security_pattern.count, 8);

        let round_trip = StampConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }
}

#[cfg(test)]
mod effect_tests {
    use crate::aging::{AgingFrame, AgingProcessor};
    use crate::color_utils::InkMatcher;
    use crate::models::SecurityPatternConfig;
    use crate::security::{pattern_base_angle, SecurityPatternGenerator};
    use crate::units::UnitScale;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tiny_skia::{Color, Pixmap};

    fn pattern_config(count: usize) -> SecurityPatternConfig {
        SecurityPatternConfig {
            count,
            ..SecurityPatternConfig::default()
        }
    }

    #[test]
    fn test_pattern_base_angle_on_circle() {
        let theta = 0.3f32;
        let expected = theta.cos().atan2(theta.sin());
        assert!((pattern_base_angle(10.0, 10.0, theta) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_security_pattern_cache_is_reused() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = pattern_config(5);
        let mut mask = Pixmap::new(200, 200).unwrap();
        mask.fill(Color::WHITE);
        let mut generator = SecurityPatternGenerator::new();

        generator.apply(
            &mut mask.as_mut(),
            &mut rng,
            &config,
            UnitScale::default(),
            (100.0, 100.0),
            80.0,
            60.0,
            false,
        );
        let first = generator.params().to_vec();
        assert_eq!(first.len(), 5);

        generator.apply(
            &mut mask.as_mut(),
            &mut rng,
            &config,
            UnitScale::default(),
            (100.0, 100.0),
            80.0,
            60.0,
            false,
        );
        assert_eq!(generator.params(), first.as_slice());

        generator.apply(
            &mut mask.as_mut(),
            &mut rng,
            &config,
            UnitScale::default(),
            (100.0, 100.0),
            80.0,
            60.0,
            true,
        );
        assert_ne!(generator.params(), first.as_slice());
    }

    #[test]
    fn test_security_pattern_erases_mask() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = pattern_config(20);
        config.width = 1.0;
        let mut mask = Pixmap::new(200, 200).unwrap();
        mask.fill(Color::WHITE);
        let mut generator = SecurityPatternGenerator::new();
        generator.apply(
            &mut mask.as_mut(),
            &mut rng,
            &config,
            UnitScale::default(),
            (100.0, 100.0),
            80.0,
            60.0,
            false,
        );
        let erased = mask.pixels().iter().filter(|px| px.alpha() < 255).count();
        assert!(erased > 0);
    }

    #[test]
    fn test_disabled_pattern_keeps_cache() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut generator = SecurityPatternGenerator::new();
        generator.regenerate(&mut rng, &pattern_config(3), 50.0, 50.0);
        let cached = generator.params().to_vec();

        let mut config = pattern_config(3);
        config.open_security_pattern = false;
        let mut mask = Pixmap::new(100, 100).unwrap();
        mask.fill(Color::WHITE);
        let before = mask.data().to_vec();
        generator.apply(
            &mut mask.as_mut(),
            &mut rng,
            &config,
            UnitScale::default(),
            (50.0, 50.0),
            40.0,
            40.0,
            true,
        );
        assert_eq!(generator.params(), cached.as_slice());
        assert_eq!(mask.data(), before.as_slice());
    }

    #[test]
    fn test_byte_index_on_large_frames() {
        let frame = AgingFrame {
            width: 70_000,
            height: 70_000,
            center: (35_000.0, 35_000.0),
            radius: 100.0,
        };
        assert_eq!(frame.byte_index(3, 2), (2 * 70_000 + 3) * 4);
        assert_eq!(frame.byte_index(69_999, 69_999), 70_000usize * 70_000 * 4 - 4);
    }

    fn red_buffer(width: u32, height: u32) -> Vec<u8> {
        [255u8, 0, 0, 255].repeat((width * height) as usize)
    }

    #[test]
    fn test_aging_confined_to_radius() {
        let frame = AgingFrame {
            width: 64,
            height: 64,
            center: (32.0, 32.0),
            radius: 12.0,
        };
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut data = red_buffer(64, 64);
            let mut aging = AgingProcessor::new();
            aging.apply(&mut rng, &mut data, frame, InkMatcher::new(255, 0, 0), 100.0, false);
            assert!(!aging.params().is_empty());

            let mut changed_inside = 0;
            for y in 0..64u32 {
                for x in 0..64u32 {
                    let i = ((y * 64 + x) * 4) as usize;
                    let px = &data[i..i + 4];
                    let dist = ((x as f32 - 32.0).powi(2) + (y as f32 - 32.0).powi(2)).sqrt();
                    if dist > frame.radius {
                        assert_eq!(px, &[255, 0, 0, 255], "pixel ({x}, {y}) modified");
                    } else if px != [255, 0, 0, 255] {
                        changed_inside += 1;
                    }
                }
            }
            assert!(changed_inside > 0);
        }
    }

    #[test]
    fn test_aging_replays_cached_draw() {
        let frame = AgingFrame {
            width: 32,
            height: 32,
            center: (16.0, 16.0),
            radius: 10.0,
        };
        let ink = InkMatcher::new(255, 0, 0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut aging = AgingProcessor::new();

        let mut first = red_buffer(32, 32);
        aging.apply(&mut rng, &mut first, frame, ink, 60.0, false);
        let cached = aging.params().to_vec();

        let mut second = red_buffer(32, 32);
        aging.apply(&mut rng, &mut second, frame, ink, 60.0, false);
        assert_eq!(first, second);
        assert_eq!(aging.params(), cached.as_slice());

        let mut third = red_buffer(32, 32);
        aging.apply(&mut rng, &mut third, frame, ink, 60.0, true);
        assert_ne!(aging.params(), cached.as_slice());
    }

    #[test]
    fn test_aging_skips_non_ink() {
        let frame = AgingFrame {
            width: 16,
            height: 16,
            center: (8.0, 8.0),
            radius: 8.0,
        };
        let mut data = [255u8, 255, 255, 255].repeat(16 * 16);
        let before = data.clone();
        let mut aging = AgingProcessor::new();
        let mut rng = StdRng::seed_from_u64(1);
        aging.apply(&mut rng, &mut data, frame, InkMatcher::new(255, 0, 0), 100.0, false);
        assert!(aging.params().is_empty());
        assert_eq!(data, before);
    }
}

#[cfg(test)]
mod renderer_tests {
    use crate::font_utils::FontBook;
    use crate::models::StampConfig;
    use crate::renderer::{RenderOptions, RenderStage, SealRenderer};
    use crate::units::UnitScale;
    use crate::StampError;
    use tiny_skia::Pixmap;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        (c.red(), c.green(), c.blue(), c.alpha())
    }

    fn scenario_config() -> StampConfig {
        let mut config = StampConfig::default();
        config.width = 40.0;
        config.height = 30.0;
        config.border_width = 1.0;
        config.company_name.text = "印章绘制公司".to_string();
        config.security_pattern.open_security_pattern = false;
        config.aging.apply_aging = false;
        config
    }

    fn renderer(seed: u64) -> SealRenderer {
        SealRenderer::with_fonts(500, 500, UnitScale::default(), FontBook::new())
            .unwrap()
            .with_seed(seed)
    }

    #[test]
    fn test_zero_sized_surface_fails() {
        let result = SealRenderer::with_fonts(0, 10, UnitScale::default(), FontBook::new());
        assert!(matches!(result, Err(StampError::SurfaceAllocation { .. })));
    }

    #[test]
    fn test_plain_seal_render_is_stable() {
        let mut renderer = renderer(1);
        renderer.configure(scenario_config()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(renderer.stage(), RenderStage::Done);
        let first = renderer.surface().data().to_vec();

        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(renderer.surface().data(), first.as_slice());
        assert!(renderer.security_pattern().params().is_empty());
        assert!(renderer.aging().params().is_empty());

        // Border is tinted on both axes
        let geometry = renderer.geometry();
        assert_eq!(geometry.radius_x, 78.0);
        assert_eq!(geometry.radius_y, 58.0);
        assert_eq!(pixel(renderer.surface(), 328, 250), (255, 0, 0, 255));
        assert_eq!(pixel(renderer.surface(), 250, 250 - 58), (255, 0, 0, 255));
    }

    #[test]
    fn test_background_outside_shapes_stays_white() {
        let mut config = scenario_config();
        config.draw_star.draw_star = true;
        let mut renderer = renderer(2);
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();

        let surface = renderer.surface();
        for (x, y) in [(5, 5), (495, 495), (250, 20), (20, 250), (400, 250)] {
            assert_eq!(pixel(surface, x, y), (255, 255, 255, 255), "({x}, {y})");
        }
        // Star centre is inked, a point between star and border is not
        assert_eq!(pixel(surface, 250, 250), (255, 0, 0, 255));
        assert_eq!(pixel(surface, 310, 250), (255, 255, 255, 255));
        // Seal layer keeps transparency outside the shapes
        assert_eq!(pixel(renderer.seal_layer(), 5, 5).3, 0);
    }

    #[test]
    fn test_refresh_redraws_security_pattern() {
        let mut config = scenario_config();
        config.security_pattern.open_security_pattern = true;
        config.security_pattern.count = 5;
        let mut renderer = renderer(3);
        renderer.configure(config).unwrap();

        let refresh = RenderOptions {
            refresh_security_pattern: true,
            ..RenderOptions::default()
        };
        renderer.render(refresh).unwrap();
        let first = renderer.security_pattern().params().to_vec();
        assert_eq!(first.len(), 5);

        renderer.render(refresh).unwrap();
        let second = renderer.security_pattern().params().to_vec();
        assert_eq!(second.len(), 5);
        assert!(first.iter().zip(&second).any(|(a, b)| a.angle != b.angle));
    }

    #[test]
    fn test_pattern_stable_without_refresh() {
        let mut config = scenario_config();
        config.security_pattern.open_security_pattern = true;
        config.security_pattern.width = 0.5;
        let mut renderer = renderer(4);
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        let first = renderer.surface().data().to_vec();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(renderer.surface().data(), first.as_slice());
    }

    #[test]
    fn test_one_shot_config_flag_is_consumed() {
        let mut config = scenario_config();
        config.security_pattern.open_security_pattern = true;
        let mut renderer = renderer(5);
        renderer.configure(config.clone()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        let cached = renderer.security_pattern().params().to_vec();

        config.refresh_security_pattern = true;
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_ne!(renderer.security_pattern().params(), cached.as_slice());
        assert!(!renderer.config().refresh_security_pattern);

        let refreshed = renderer.security_pattern().params().to_vec();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(renderer.security_pattern().params(), refreshed.as_slice());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut renderer = renderer(6);
        renderer.configure(scenario_config()).unwrap();
        let mut bad = scenario_config();
        bad.height = -3.0;
        assert!(renderer.configure(bad).is_err());
        assert_eq!(renderer.config().height, 30.0);
    }

    #[test]
    fn test_offset_moves_seal() {
        let mut renderer = renderer(7);
        renderer.configure(scenario_config()).unwrap();
        renderer.set_offset(10.0, 0.0);
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(pixel(renderer.surface(), 290 + 78, 250), (255, 0, 0, 255));
        assert_eq!(pixel(renderer.surface(), 250 - 78, 250), (255, 255, 255, 255));
    }

    #[test]
    fn test_aging_stays_inside_seal() {
        let mut config = scenario_config();
        let mut renderer = renderer(8);
        renderer.configure(config.clone()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        let plain = renderer.surface().clone();

        config.aging.apply_aging = true;
        config.aging.intensity = 100.0;
        renderer.configure(config).unwrap();
        renderer
            .render(RenderOptions {
                refresh_aging: true,
                ..RenderOptions::default()
            })
            .unwrap();
        assert!(!renderer.aging().params().is_empty());
        let aged = renderer.surface().clone();
        assert_ne!(aged.data(), plain.data());

        let radius = 80.0;
        for y in 0..500u32 {
            for x in 0..500u32 {
                let dist = ((x as f32 - 250.0).powi(2) + (y as f32 - 250.0).powi(2)).sqrt();
                if dist > radius {
                    assert_eq!(pixel(&aged, x, y), pixel(&plain, x, y), "({x}, {y})");
                }
            }
        }

        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(renderer.surface().data(), aged.data());
    }

    #[test]
    fn test_export_has_uniform_margin() {
        let mut renderer = renderer(9);
        renderer.configure(scenario_config()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        let before = renderer.surface().data().to_vec();

        let output = renderer.export(512).unwrap();
        assert_eq!((output.width(), output.height()), (512, 512));
        for i in 0..512 {
            for edge in [0u32, 4, 507, 511] {
                assert_eq!(pixel(&output, edge, i).3, 0, "column {edge}, row {i}");
                assert_eq!(pixel(&output, i, edge).3, 0, "row {edge}, column {i}");
            }
        }
        let (r, g, _, a) = pixel(&output, 23, 256);
        assert!(a > 200 && r > 200 && g < 50);
        assert_eq!(renderer.surface().data(), before.as_slice());
    }

    #[test]
    fn test_inner_ring_is_drawn_when_enabled() {
        let mut config = scenario_config();
        let mut renderer = renderer(13);
        renderer.configure(config.clone()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(pixel(renderer.surface(), 319, 250), (255, 255, 255, 255));

        // Border line at 78 px, ring two border widths (8 px) inside it
        config.inner_circle.show_inner_circle = true;
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(pixel(renderer.surface(), 319, 250), (255, 0, 0, 255));
        assert_eq!(pixel(renderer.surface(), 314, 250), (255, 255, 255, 255));
    }

    #[test]
    fn test_export_with_background_fills_margin() {
        let mut renderer = renderer(14);
        renderer.configure(scenario_config()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();

        let transparent = renderer.export(128).unwrap();
        assert_eq!(pixel(&transparent, 0, 0).3, 0);

        let output = renderer
            .export_with_background(128, Some(tiny_skia::Color::WHITE))
            .unwrap();
        assert_eq!(pixel(&output, 0, 0), (255, 255, 255, 255));
        assert_eq!(pixel(&output, 127, 64), (255, 255, 255, 255));
        // Seal ink is still drawn over the fill
        let (r, g, _, a) = pixel(&output, 6, 64);
        assert_eq!(a, 255);
        assert!(r > 200 && g < 60, "border pixel ({r}, {g})");
    }

    #[test]
    fn test_export_png_writes_file() {
        let mut renderer = renderer(10);
        renderer.configure(scenario_config()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seal.png");
        renderer.export_png(256, &path, false).unwrap();

        let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 256);
        assert_eq!(reader.info().height, 256);
    }

    #[test]
    fn test_ruler_draws_over_surface_only() {
        let mut config = scenario_config();
        config.ruler.show_ruler = true;
        config.ruler.show_full_ruler = true;
        let mut renderer = renderer(11);
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(pixel(renderer.surface(), 40, 70), (211, 211, 211, 255));
        assert_eq!(pixel(renderer.seal_layer(), 40, 70).3, 0);

        renderer
            .render(RenderOptions {
                draw_ruler: false,
                ..RenderOptions::default()
            })
            .unwrap();
        assert_eq!(pixel(renderer.surface(), 40, 70), (255, 255, 255, 255));
    }
}

#[cfg(test)]
mod font_tests {
    use crate::font_utils::{FontBook, GlyphShape, TextBaseline};
    use crate::layout::{layout_text, ArcDirection, LayoutStrategy, TextPath};
    use crate::models::StampConfig;
    use crate::renderer::{RenderOptions, SealRenderer};
    use crate::units::UnitScale;
    use euclid::default::Point2D;
    use std::f32::consts::FRAC_PI_2;
    use tiny_skia::Pixmap;

    fn shape() -> GlyphShape {
        GlyphShape {
            path: None,
            advance: 10.0,
            ascent: 8.0,
            descent: -2.0,
        }
    }

    #[test]
    fn test_anchor_offset_per_baseline() {
        let glyph = shape();
        assert_eq!(glyph.anchor_offset(TextBaseline::Bottom), (-5.0, -2.0));
        assert_eq!(glyph.anchor_offset(TextBaseline::Middle), (-5.0, 3.0));
        assert_eq!(glyph.anchor_offset(TextBaseline::Top), (-5.0, 8.0));
    }

    #[test]
    fn test_empty_book_caches_lookups() {
        let mut fonts = FontBook::new();
        assert!(fonts.is_empty());
        assert!(fonts.glyph("SimSun", '印', 16.0).is_none());
        assert_eq!(fonts.advance("SimSun", '章', 16.0), 0.0);
        assert_eq!(fonts.cached_family_count(), 1);

        assert!(fonts.glyph("Arial", '1', 16.0).is_none());
        assert_eq!(fonts.cached_family_count(), 2);

        fonts.load_font_data(Vec::new());
        assert_eq!(fonts.cached_family_count(), 0);
    }

    /// Inked pixels in a 13 x 13 window centred `out` px beyond `at`,
    /// moving away from the seal centre along `angle`.
    fn ink_near(layer: &Pixmap, at: Point2D<f32>, angle: f32, out: f32) -> usize {
        let cx = (at.x + out * angle.cos()).round() as i32;
        let cy = (at.y + out * angle.sin()).round() as i32;
        let mut count = 0;
        for y in cy - 6..=cy + 6 {
            for x in cx - 6..=cx + 6 {
                if let Some(px) = layer.pixel(x as u32, y as u32) {
                    if px.alpha() > 0 {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    #[test]
    fn test_company_glyphs_reach_seal_layer() {
        let fonts = FontBook::with_system_fonts();
        if fonts.glyph("SimSun", '印', 16.0).is_none() {
            // No face on this machine covers the title
            return;
        }

        let mut config = StampConfig::default();
        config.company_name.text = "印章绘制公司".to_string();
        config.security_pattern.open_security_pattern = false;
        let mut renderer = SealRenderer::with_fonts(500, 500, UnitScale::default(), fonts)
            .unwrap()
            .with_seed(1);
        renderer.configure(config.clone()).unwrap();
        renderer.render(RenderOptions::default()).unwrap();

        let geometry = renderer.geometry();
        let scale = renderer.scale();
        let company = &config.company_name;
        let inset = scale.mm_to_px(company.font_size_mm + company.margin_mm);
        let path = TextPath::Arc {
            center: Point2D::new(geometry.center.0, geometry.center.1),
            radius_x: geometry.radius_x - inset,
            radius_y: geometry.radius_y - inset,
            mid_angle: -FRAC_PI_2,
            span: company.span(),
            direction: ArcDirection::Clockwise,
        };
        let placements = layout_text(&company.text, &path, LayoutStrategy::EqualAngle, &[]);
        assert_eq!(placements.len(), 6);
        let first = placements[0];

        let inked = ink_near(renderer.seal_layer(), first.position, first.slot, 8.0);
        assert!(inked > 0, "no ink around the first title glyph");

        config.company_name.text.clear();
        renderer.configure(config).unwrap();
        renderer.render(RenderOptions::default()).unwrap();
        assert_eq!(ink_near(renderer.seal_layer(), first.position, first.slot, 8.0), 0);
    }
}
