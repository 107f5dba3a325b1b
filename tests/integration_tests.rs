use timbermap::{
    core::geo::{LatLng, Point},
    input::events::{InputEvent, TouchEventType, TouchPoint},
    layers::{marker::MarkerLayer, route::RouteLayer},
    Container, MapEngine, MapEngineBuilder, WeatherKind, WeatherLayer,
};

/// Integration tests driving the engine the way the site does
#[cfg(test)]
mod integration_tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn atlanta_engine() -> MapEngine {
        init_logging();
        let mut engine = MapEngineBuilder::new()
            .with_standard_overlays()
            .build()
            .expect("default options are valid");
        engine.init(Some(
            Container::new("map", Point::new(800.0, 600.0)).with_placeholder("Loading map..."),
        ));
        engine
    }

    fn drag(engine: &mut MapEngine, from: Point, to: Point) {
        engine.handle_input(&InputEvent::MouseDown { position: from });
        engine.handle_input(&InputEvent::MouseMove { position: to });
        engine.handle_input(&InputEvent::MouseUp);
    }

    #[test]
    fn test_initial_tile_set() {
        let engine = atlanta_engine();
        let tiles = engine.tiles();
        assert_eq!(tiles.len(), 12);

        let xs: Vec<u32> = tiles.iter().map(|t| t.coord.x).collect();
        let ys: Vec<u32> = tiles.iter().map(|t| t.coord.y).collect();
        assert_eq!(xs.iter().min(), Some(&2174));
        assert_eq!(xs.iter().max(), Some(&2177));
        assert_eq!(ys.iter().min(), Some(&3278));
        assert_eq!(ys.iter().max(), Some(&3280));
        assert!(tiles.iter().all(|t| t.coord.z == 13));
        assert!(tiles
            .iter()
            .any(|t| t.url == "https://tile.openstreetmap.org/13/2175/3279.png"));
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let mut engine = atlanta_engine();
        drag(&mut engine, Point::new(400.0, 300.0), Point::new(517.0, 241.0));

        for corner in [
            Point::new(0.0, 0.0),
            Point::new(799.0, 0.0),
            Point::new(0.0, 599.0),
            Point::new(799.0, 599.0),
            Point::new(400.0, 300.0),
        ] {
            assert!(
                engine.tiles().iter().any(|t| {
                    let max = t.screen_max();
                    corner.x >= t.screen.x && corner.x < max.x && corner.y >= t.screen.y && corner.y < max.y
                }),
                "no tile under {:?}",
                corner
            );
        }
    }

    #[test]
    fn test_zoom_clamping() {
        let mut engine = atlanta_engine();
        engine.set_zoom(1);
        assert_eq!(engine.zoom(), 2);
        engine.set_zoom(25);
        assert_eq!(engine.zoom(), 20);

        let view = *engine.view();
        engine.set_zoom(21);
        assert_eq!(engine.view(), &view);
    }

    #[test]
    fn test_wheel_zoom_keeps_point_under_cursor() {
        let mut engine = atlanta_engine();
        let anchor = Point::new(610.0, 95.0);
        let before = engine.screen_to_lat_lng(&anchor);

        engine.handle_input(&InputEvent::Wheel {
            delta_y: -100.0,
            position: anchor,
        });
        assert_eq!(engine.zoom(), 14);

        let after = engine.screen_to_lat_lng(&anchor);
        assert!((before.lat - after.lat).abs() < 1e-6, "{:?} vs {:?}", before, after);
        assert!((before.lng - after.lng).abs() < 1e-6, "{:?} vs {:?}", before, after);

        engine.handle_input(&InputEvent::Wheel {
            delta_y: 100.0,
            position: anchor,
        });
        assert_eq!(engine.zoom(), 13);
    }

    #[test]
    fn test_pan_offset_stays_within_a_tile() {
        let mut engine = atlanta_engine();
        let steps = [
            (90.0, 40.0),
            (120.0, -30.0),
            (75.0, 75.0),
            (-300.0, 10.0),
            (5.0, 260.0),
            (-20.0, -20.0),
        ];

        for (dx, dy) in steps {
            // The point now in the middle moves to middle + delta
            let middle = Point::new(400.0, 300.0);
            let target = Point::new(400.0 + dx, 300.0 + dy);
            let under_target_before = engine.screen_to_lat_lng(&middle);

            drag(&mut engine, middle, target);

            let offset = engine.view().pan_offset;
            assert!(offset.x.abs() <= 256.0 && offset.y.abs() <= 256.0, "{:?}", offset);

            let under_target = engine.screen_to_lat_lng(&target);
            assert!((under_target.lat - under_target_before.lat).abs() < 1e-6);
            assert!((under_target.lng - under_target_before.lng).abs() < 1e-6);
        }
    }

    #[test]
    fn test_job_marker_at_overlay_center() {
        let mut engine = atlanta_engine();
        engine
            .overlay_mut::<MarkerLayer>()
            .expect("marker layer")
            .add_job_marker(40.0, -73.0);
        engine.set_center(40.0, -73.0);

        let host_center = engine.overlay_layer().expect("mounted").center();
        let markers = engine.overlay_mut::<MarkerLayer>().expect("marker layer");
        markers.reposition_all();
        let element = *markers
            .job_marker()
            .and_then(|m| m.element())
            .expect("positioned");
        assert!((element.screen.x - host_center.x).abs() < 1e-6);
        assert!((element.screen.y - host_center.y).abs() < 1e-6);
    }

    #[test]
    fn test_overlays_follow_drag() {
        let mut engine = atlanta_engine();
        if let Some(route) = engine.overlay_mut::<RouteLayer>() {
            route.set_route(LatLng::new(33.749, -84.388), LatLng::new(33.76, -84.37));
        }
        let start = engine.lat_lng_to_screen(&LatLng::new(33.749, -84.388));

        drag(&mut engine, Point::new(100.0, 100.0), Point::new(140.0, 90.0));

        let moved = engine.lat_lng_to_screen(&LatLng::new(33.749, -84.388));
        assert!((moved.x - start.x - 40.0).abs() < 1e-6);
        assert!((moved.y - start.y + 10.0).abs() < 1e-6);

        let route = engine.overlay::<RouteLayer>().expect("route layer");
        assert!(!route.canvas().is_empty());
    }

    #[test]
    fn test_single_finger_touch_pans() {
        let mut engine = atlanta_engine();
        let touch = |event_type, x, y| InputEvent::Touch {
            event_type,
            touches: vec![TouchPoint::new(0, Point::new(x, y))],
        };
        engine.handle_input(&touch(TouchEventType::Start, 200.0, 200.0));
        engine.handle_input(&touch(TouchEventType::Move, 230.0, 200.0));
        engine.handle_input(&touch(TouchEventType::End, 230.0, 200.0));
        assert_eq!(engine.view().pan_offset, Point::new(30.0, 0.0));

        engine.handle_input(&touch(TouchEventType::Move, 300.0, 300.0));
        assert_eq!(engine.view().pan_offset, Point::new(30.0, 0.0));
    }

    #[test]
    fn test_deferred_overlay_init() {
        init_logging();
        let mut engine = MapEngine::default();
        engine.add_overlay(Box::new(WeatherLayer::default()));
        engine
            .overlay_mut::<WeatherLayer>()
            .expect("weather layer")
            .set_enabled(WeatherKind::Storms, true);

        // Nothing is drawn until the map is mounted
        engine.set_center(34.0, -84.0);
        assert!(engine
            .overlay::<WeatherLayer>()
            .expect("weather layer")
            .canvas()
            .is_empty());

        engine.init(Some(Container::new("map", Point::new(800.0, 600.0))));
        let weather = engine.overlay::<WeatherLayer>().expect("weather layer");
        assert!(weather.is_enabled(WeatherKind::Storms));
        assert_eq!(weather.canvas().commands().len(), 2);
    }

    #[test]
    fn test_invalid_container_is_noop() {
        init_logging();
        let mut engine = MapEngine::default();
        engine.init(None);
        engine.set_zoom(15);
        assert!(!engine.is_initialized());
        assert!(engine.tiles().is_empty());
        assert!(engine.layer_ids().is_empty());
    }
}
