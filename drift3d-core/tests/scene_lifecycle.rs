use drift3d_core::color::Paint;
use drift3d_core::config::TierProfile;
use drift3d_core::surface::{Command, PaintState};
use drift3d_core::{
    Composite, DeviceTier, Layer, RecordingSurface, Scene, SceneConfig, Scheduler, Tick, Viewport,
};

fn viewport(width: f32, height: f32) -> Viewport {
    Viewport::new(width, height, 1.0).unwrap()
}

#[test]
fn counts_follow_tier_formulas() {
    let cases = [
        (1400.0, 900.0, DeviceTier::Desktop, TierProfile::desktop()),
        (900.0, 700.0, DeviceTier::Tablet, TierProfile::tablet()),
        (390.0, 844.0, DeviceTier::Mobile, TierProfile::mobile()),
    ];
    for (w, h, tier, profile) in cases {
        let vp = viewport(w, h);
        let scene = Scene::new(vp, tier, SceneConfig::default(), 3);
        let counts = scene.counts();

        let particles = ((w * h / profile.particle_area).floor() as usize + profile.particle_base)
            .min(profile.particle_max);
        let stars = (w * h / profile.star_area).floor() as usize + profile.star_base;

        assert_eq!(counts.solids, profile.solid_count, "{tier:?}");
        assert_eq!(counts.beams, profile.beam_count, "{tier:?}");
        assert_eq!(counts.particles, particles, "{tier:?}");
        assert_eq!(counts.stars, stars, "{tier:?}");
        assert_eq!(counts.orbs, profile.orb_count, "{tier:?}");
        assert_eq!(counts.clouds, profile.cloud_count, "{tier:?}");
        assert_eq!(counts.motes, profile.cloud_count * profile.cloud_motes, "{tier:?}");
    }
}

#[test]
fn resize_replaces_every_entity() {
    let mut scene = Scene::new(viewport(1400.0, 900.0), DeviceTier::Desktop, SceneConfig::default(), 9);
    let before_generation = scene.generation();
    let before_solids: Vec<_> = scene.solids.iter().map(|s| (s.position, s.kind)).collect();
    let before_particles: Vec<_> = scene.particles.iter().map(|p| p.position).collect();

    let small = viewport(600.0, 800.0);
    scene.rebuild(small, DeviceTier::Mobile);

    assert_eq!(scene.generation(), before_generation + 1);
    assert_eq!(scene.viewport(), &small);

    let profile = TierProfile::mobile();
    let counts = scene.counts();
    assert_eq!(counts.solids, profile.solid_count);
    assert_eq!(counts.particles, profile.particle_count(&small));
    assert_eq!(counts.stars, profile.star_count(&small));

    for solid in &scene.solids {
        assert!(!before_solids.contains(&(solid.position, solid.kind)));
        // Placement follows the new viewport
        assert!(solid.position.x >= 0.0 && solid.position.x <= small.width);
    }
    for particle in &scene.particles {
        assert!(!before_particles.contains(&particle.position));
    }
}

#[test]
fn draw_runs_back_to_front_with_neutral_state() {
    let scene = Scene::new(viewport(1200.0, 800.0), DeviceTier::Desktop, SceneConfig::default(), 5);
    let frame = scene.frame(0.0, 0);
    let mut surface = RecordingSurface::new();
    scene.draw(&mut surface, &frame);

    let first = surface.commands.first().expect("background wash");
    match first {
        Command::FillRect { state, w, h, .. } => {
            assert_eq!((*w, *h), (1200.0, 800.0));
            assert_eq!(state.fill, Paint::from(scene.config().palette.bg));
        }
        other => panic!("expected wash, got {other:?}"),
    }

    let last = surface.commands.last().expect("vignette");
    match last {
        Command::FillRect { state, .. } => assert!(matches!(state.fill, Paint::Radial(_))),
        other => panic!("expected vignette, got {other:?}"),
    }

    assert_eq!(surface.save_depth(), 0);
    assert_eq!(surface.state().alpha, 1.0);
    assert_eq!(surface.state().composite, Composite::SourceOver);
}

/// Command geometry without the paint state it was issued under
fn geometry(command: &Command) -> Command {
    let mut command = command.clone();
    match &mut command {
        Command::FillRect { state, .. } | Command::Fill { state, .. } | Command::Stroke { state, .. } => {
            *state = PaintState::default()
        }
    }
    command
}

#[test]
fn layers_draw_in_compositing_order() {
    assert_eq!(
        Layer::ORDER,
        [
            Layer::Background,
            Layer::DeepBackground,
            Layer::Solids,
            Layer::Atmosphere,
            Layer::Lighting,
            Layer::Particles,
            Layer::Overlays,
            Layer::Vignette,
        ]
    );

    let scene = Scene::new(viewport(1400.0, 900.0), DeviceTier::Desktop, SceneConfig::default(), 8);
    let frame = scene.frame(1.0, 60);

    let per_layer: Vec<(Layer, Vec<Command>)> = Layer::ORDER
        .iter()
        .map(|&layer| {
            let mut surface = RecordingSurface::new();
            scene.draw_layer(layer, &mut surface, &frame);
            (layer, surface.commands)
        })
        .collect();
    for (layer, commands) in &per_layer {
        assert!(!commands.is_empty(), "{layer:?} drew nothing");
    }

    // The full draw is exactly the layers concatenated back to front
    let mut full = RecordingSurface::new();
    scene.draw(&mut full, &frame);
    let expected: Vec<Command> = per_layer.iter().flat_map(|(_, c)| c.iter().map(geometry)).collect();
    let actual: Vec<Command> = full.commands.iter().map(geometry).collect();
    assert_eq!(actual, expected);

    let layer = |wanted: Layer| &per_layer.iter().find(|(l, _)| *l == wanted).unwrap().1;
    // Stars are square fills, solids are wireframe strokes, orbs are additive radial glows
    assert!(matches!(layer(Layer::DeepBackground)[0], Command::FillRect { .. }));
    assert!(layer(Layer::Solids).iter().all(|c| matches!(c, Command::Stroke { .. })));
    assert!(layer(Layer::Lighting).iter().all(|c| matches!(
        c,
        Command::Fill { state, .. }
            if matches!(state.fill, Paint::Radial(_)) && state.composite == Composite::Lighter
    )));
    assert!(layer(Layer::Particles).iter().any(|c| matches!(c, Command::Fill { .. })));
}

#[test]
fn long_run_keeps_collections_stable() {
    let vp = viewport(1024.0, 768.0);
    let mut scheduler = Scheduler::new(vp, DeviceTier::Desktop, SceneConfig::default(), 11);
    let counts = scheduler.scene().counts();
    let mut surface = RecordingSurface::new();

    for i in 0..900 {
        surface.clear();
        assert_eq!(scheduler.tick(i as f64 * 16.7, &mut surface), Tick::Continue);
    }

    let scene = scheduler.scene();
    assert_eq!(scene.counts(), counts);
    // Particles travel at most 5 depth units per tick, so 900 ticks forces recycling
    assert!(scene.particles.iter().all(|p| p.recycles() > 0));
    let depths: Vec<f32> = scene.solids.iter().map(|s| s.depth()).collect();
    assert!(depths.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn scheduler_resize_rebuilds_scene() {
    let mut scheduler = Scheduler::new(viewport(1400.0, 900.0), DeviceTier::Desktop, SceneConfig::default(), 2);
    let generation = scheduler.scene().generation();
    scheduler.resize(viewport(800.0, 600.0), DeviceTier::Tablet);
    assert_eq!(scheduler.scene().generation(), generation + 1);
    assert_eq!(scheduler.scene().tier(), DeviceTier::Tablet);
    assert_eq!(scheduler.scene().counts().solids, TierProfile::tablet().solid_count);
}
