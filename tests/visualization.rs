use approx::assert_relative_eq;

use coord3d::scene::{
    DiagramKind, HeadlessSurface, LifecycleState, NodeRole, ParameterEdit, SurfaceSize, TickStatus, Visualization,
};
use coord3d::{MeshConfig, SceneConfig, VizError};

fn mount(kind: DiagramKind) -> Visualization<HeadlessSurface> {
    Visualization::mount(
        HeadlessSurface::new(SurfaceSize::new(800, 600)),
        kind.diagram(),
        SceneConfig::default(),
        MeshConfig::default(),
    )
}

#[test]
fn single_edit_is_one_dispose_and_one_rebuild() {
    let mut viz = mount(DiagramKind::SphericalVolume);
    let before = viz.cycle().stats();

    let applied = viz.set_parameter("r", 3.0).unwrap();

    assert_relative_eq!(applied, 3.0);
    let after = viz.cycle().stats();
    assert_eq!(after.rebuilds, before.rebuilds + 1);
    assert_eq!(after.disposals, before.disposals + 1);
}

#[test]
fn rapid_edits_do_not_accumulate_geometry() {
    let mut viz = mount(DiagramKind::SphericalVolume);
    let nodes = viz.lifecycle().scene().len();
    let live = viz.lifecycle().surface().live_geometries();

    for i in 0..25 {
        viz.set_parameter("phi", 10.0 + i as f64).unwrap();
    }

    let scene = viz.lifecycle().scene();
    assert_eq!(scene.count(NodeRole::Element), 1);
    assert_eq!(scene.count(NodeRole::Edge), 12);
    assert_eq!(scene.len(), nodes);
    assert_eq!(viz.lifecycle().surface().live_geometries(), live);
}

#[test]
fn batched_edits_apply_in_order() {
    let mut viz = mount(DiagramKind::CylindricalVolume);
    let rebuilds = viz.cycle().stats().rebuilds;

    viz.apply(&[
        ParameterEdit { name: "r".into(), value: 1.0 },
        ParameterEdit { name: "r".into(), value: 4.0 },
    ])
    .unwrap();

    assert_relative_eq!(viz.store().get("r").unwrap(), 4.0);
    assert_eq!(viz.cycle().stats().rebuilds, rebuilds + 2);
}

#[test]
fn unknown_parameter_leaves_scene_untouched() {
    let mut viz = mount(DiagramKind::CartesianVolume);
    let rebuilds = viz.cycle().stats().rebuilds;

    let err = viz.set_parameter("w", 1.0).unwrap_err();

    assert!(matches!(err, VizError::UnknownParameter(name) if name == "w"));
    assert_eq!(viz.cycle().stats().rebuilds, rebuilds);
}

#[test]
fn polar_extent_is_clamped_into_domain() {
    let mut viz = mount(DiagramKind::SphericalVolume);

    viz.set_parameter("theta", 170.0).unwrap();
    assert_relative_eq!(viz.store().get("dtheta").unwrap(), 10.0, epsilon = 1e-9);

    let applied = viz.set_parameter("dtheta", 90.0).unwrap();
    assert_relative_eq!(applied, 10.0, epsilon = 1e-9);
}

#[test]
fn reset_restores_initial_values() {
    let mut viz = mount(DiagramKind::CartesianVolume);
    viz.set_parameter("x", -4.0).unwrap();

    viz.reset().unwrap();

    assert_relative_eq!(viz.store().get("x").unwrap(), 1.0);
}

#[test]
fn dispose_releases_every_resource() {
    let mut viz = mount(DiagramKind::SphericalSurfaceR);
    assert!(viz.lifecycle().surface().live_geometries() > 0);

    let released = viz.dispose();

    assert!(released > 0);
    assert_eq!(viz.lifecycle().state(), LifecycleState::Disposed);
    assert!(viz.lifecycle().scene().is_empty());
    assert_eq!(viz.lifecycle().surface().live_geometries(), 0);
    assert_eq!(viz.lifecycle().surface().live_materials(), 0);
    assert_eq!(viz.dispose(), 0);
}

#[test]
fn nothing_runs_after_dispose() {
    let mut viz = mount(DiagramKind::CylindricalPoint);
    assert_eq!(viz.tick().unwrap(), TickStatus::Rendered);
    let notifier = viz.lifecycle().resize_notifier().unwrap();
    let frames = viz.lifecycle().surface().frames;
    let resizes = viz.lifecycle().surface().resizes;

    viz.dispose();

    assert_eq!(viz.tick().unwrap(), TickStatus::Stopped);
    assert!(!notifier.notify(SurfaceSize::new(1024, 768)));
    assert!(viz.lifecycle().resize_notifier().is_none());
    assert!(matches!(viz.set_parameter("r", 2.0), Err(VizError::Disposed)));
    assert_eq!(viz.lifecycle().surface().frames, frames);
    assert_eq!(viz.lifecycle().surface().resizes, resizes);
}

#[test]
fn resize_is_applied_on_next_tick_once() {
    let mut viz = mount(DiagramKind::CartesianPoint);
    let notifier = viz.lifecycle().resize_notifier().unwrap();
    let resizes = viz.lifecycle().surface().resizes;

    assert!(notifier.notify(SurfaceSize::new(640, 480)));
    assert!(notifier.notify(SurfaceSize::new(1024, 768)));
    viz.tick().unwrap();

    assert_eq!(viz.lifecycle().surface().resizes, resizes + 1);
    let viewport = viz.lifecycle().viewport();
    assert_relative_eq!(viewport.width / viewport.height, 4.0 / 3.0, epsilon = 1e-4);

    notifier.notify(SurfaceSize::new(1024, 768));
    viz.tick().unwrap();
    assert_eq!(viz.lifecycle().surface().resizes, resizes + 1);
}

#[test]
fn every_diagram_mounts_and_renders() {
    for diagram in coord3d::scene::DIAGRAMS {
        let mut viz = mount(diagram.kind);
        assert_eq!(viz.tick().unwrap(), TickStatus::Rendered, "{}", diagram.title);
        assert!(viz.lifecycle().surface().last_frame.is_some());
    }
}
