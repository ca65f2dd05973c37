use resonance::{Canvas, HeroScene, HeroSceneOpts, Rgba8};

fn scene(width: u32, height: u32, seed: u64) -> HeroScene {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    HeroScene::new(HeroSceneOpts {
        canvas: Canvas::new(width, height),
        seed: Some(seed),
    })
    .unwrap()
}

#[test]
fn frame_matches_canvas_and_is_fully_opaque() {
    let mut hero = scene(320, 180, 42);
    hero.advance(0.5);
    let frame = hero.render_frame().unwrap();

    assert_eq!(frame.width, 320);
    assert_eq!(frame.height, 180);
    assert_eq!(frame.data.len(), 320 * 180 * 4);
    // The scene starts from an opaque black fill, so alpha never drops.
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn frame_is_not_flat_black() {
    let mut hero = scene(320, 180, 42);
    hero.advance(1.0);
    let frame = hero.render_frame().unwrap();

    let black = [0u8, 0, 0, 255];
    let lit = frame
        .data
        .chunks_exact(4)
        .filter(|px| *px != black)
        .count();
    // Atmosphere + orb + grain should touch the vast majority of pixels.
    assert!(lit > 320 * 180 / 2, "only {lit} non-black pixels");
}

#[test]
fn fixed_seed_reproduces_the_frame() {
    let mut a = scene(160, 90, 7);
    let mut b = scene(160, 90, 7);
    a.advance(2.0);
    b.advance(2.0);
    assert_eq!(a.render_frame().unwrap(), b.render_frame().unwrap());
}

#[test]
fn different_seeds_diverge() {
    let mut a = scene(160, 90, 1);
    let mut b = scene(160, 90, 2);
    a.advance(2.0);
    b.advance(2.0);
    assert_ne!(
        a.render_frame().unwrap().data,
        b.render_frame().unwrap().data
    );
}

#[test]
fn consecutive_frames_shimmer() {
    // The glyph field re-rolls its cell skips every frame, so two frames at
    // the same params still differ.
    let mut hero = scene(160, 90, 9);
    hero.advance(1.0);
    let first = hero.render_frame().unwrap();
    let second = hero.render_frame().unwrap();
    assert_ne!(first.data, second.data);
}

#[test]
fn zero_area_canvas_renders_empty_frames() {
    for (w, h) in [(0, 0), (0, 10), (10, 0)] {
        let mut hero = scene(w, h, 1);
        hero.advance(0.25);
        let frame = hero.render_frame().unwrap();
        assert_eq!(frame.width, w);
        assert_eq!(frame.height, h);
        assert!(frame.data.is_empty());
    }
}

#[test]
fn grain_overlay_changes_the_scene() {
    // Render the same instant with and without advancing time; the grain is
    // re-rolled per frame, so the composited result must differ even at
    // identical params. This pins the grain pass actually being composited.
    let mut hero = scene(96, 96, 13);
    hero.advance(0.1);
    let a = hero.render_frame().unwrap();
    let b = hero.render_frame().unwrap();

    let diff = a
        .data
        .iter()
        .zip(b.data.iter())
        .filter(|(x, y)| x != y)
        .count();
    assert!(diff > 96, "frames differ in only {diff} bytes");
}

#[test]
fn hue_shift_tints_the_atmosphere() {
    // Advance one scene to the opposite end of the 6 s hue yoyo; the
    // dominant background tint should differ from the t=0 scene.
    let mut early = scene(64, 64, 5);
    let mut late = scene(64, 64, 5);
    early.advance(0.01);
    late.advance(3.0);

    assert!(late.params().atmosphere_shift > early.params().atmosphere_shift);

    let avg_b_minus_g = |frame: &resonance::FrameRgba| -> f64 {
        let mut sum = 0.0;
        for px in frame.data.chunks_exact(4) {
            sum += f64::from(px[2]) - f64::from(px[1]);
        }
        sum / (frame.data.len() / 4) as f64
    };
    let fa = early.render_frame().unwrap();
    let fb = late.render_frame().unwrap();
    // Not asserting a direction per channel; just that the tint moved.
    assert!((avg_b_minus_g(&fa) - avg_b_minus_g(&fb)).abs() > 0.01);
}

#[test]
fn pixel_type_round_trips_through_frame() {
    let mut hero = scene(8, 8, 3);
    let frame = hero.render_frame().unwrap();
    let first = Rgba8::rgba(frame.data[0], frame.data[1], frame.data[2], frame.data[3]);
    assert_eq!(first.a, 255);
}
