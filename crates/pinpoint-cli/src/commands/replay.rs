//! Replay command: drive the point selection mode from a recorded trace
//!
//! A trace declares meshes and a sequence of surface events:
//!
//! ```toml
//! [[mesh]]
//! name = "tri"
//! vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
//! transform = { position = [0.0, 0.0, 1.0] }
//!
//! [[event]]
//! kind = "move"
//! mesh = "tri"
//! point = [1.0, 0.0, 1.004]
//!
//! [[event]]
//! kind = "press"
//! modifiers = ["ctrl"]
//! ```

use anyhow::{Context, Result};
use glam::{DVec3, Vec3};
use pinpoint_core::{ModeId, PinpointError, Transform};
use pinpoint_scene::{Mesh, NodePath, NodeRef, SceneNode};
use pinpoint_viewer::{
    FnTargets, HeadlessSurface, InteractionMode, ModifierKey, Modifiers, PointSelectionConfig,
    PointSelectionMode, PointerButton, SurfaceEvent,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::rc::Rc;

pub struct ReplayArgs {
    pub trace: String,
    pub config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Trace {
    #[serde(default, rename = "mesh")]
    pub meshes: Vec<MeshSpec>,
    #[serde(default, rename = "event")]
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MeshSpec {
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    #[serde(default)]
    pub transform: Transform,
    /// Whether the mesh is pickable
    #[serde(default = "default_true")]
    pub target: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Pointer over `mesh` (or the background) at a world point
    Move {
        #[serde(default)]
        mesh: Option<String>,
        point: [f64; 3],
    },
    Leave,
    Press {
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Vec<ModifierKey>,
    },
    /// Change the surface's edit flag or selected custom mode
    Mode {
        #[serde(default)]
        edit_mode: Option<bool>,
        #[serde(default)]
        custom_mode: Option<i32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub points: Vec<Vec3>,
    pub redraws: usize,
}

struct TraceScene {
    paths: HashMap<String, NodePath>,
    targets: Vec<NodeRef>,
}

impl TraceScene {
    fn build(meshes: &[MeshSpec]) -> pinpoint_core::Result<Self> {
        let root = SceneNode::group("root");
        let mut paths = HashMap::new();
        let mut targets = Vec::new();

        for mesh in meshes {
            if paths.contains_key(&mesh.name) {
                return Err(PinpointError::TraceError(format!(
                    "Duplicate mesh name '{}'",
                    mesh.name
                )));
            }
            let vertices = mesh.vertices.iter().map(|v| Vec3::from_array(*v)).collect();
            let placement = SceneNode::transform(mesh.name.as_str(), mesh.transform.to_affine());
            let shape = SceneNode::shape(mesh.name.as_str(), Some(Rc::new(Mesh::new(vertices))));
            placement.add_child(shape.clone())?;
            root.add_child(placement.clone())?;

            if mesh.target {
                targets.push(shape.clone());
            }
            paths.insert(mesh.name.clone(), NodePath::new(vec![root.clone(), placement, shape]));
        }

        Ok(Self { paths, targets })
    }

    fn path(&self, mesh: Option<&str>) -> pinpoint_core::Result<NodePath> {
        match mesh {
            Some(name) => self
                .paths
                .get(name)
                .cloned()
                .ok_or_else(|| PinpointError::TraceError(format!("Unknown mesh '{}'", name))),
            None => Ok(NodePath::default()),
        }
    }
}

/// Run `trace` on a fresh headless surface with the mode active
pub fn replay(trace: &Trace, config: PointSelectionConfig) -> Result<ReplayReport> {
    let scene = TraceScene::build(&trace.meshes)?;
    let surface = HeadlessSurface::new();

    let targets = scene.targets.clone();
    let mut mode = PointSelectionMode::new(config)?
        .with_target_provider(FnTargets::new(move |_| targets.clone()));
    surface.set_active_custom_mode(mode.custom_mode_id());
    mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));

    for (i, event) in trace.events.iter().enumerate() {
        match event {
            TraceEvent::Move { mesh, point } => {
                let path = scene
                    .path(mesh.as_deref())
                    .with_context(|| format!("Event {}", i + 1))?;
                let point = DVec3::from_array(*point);
                mode.on_pointer_move(&SurfaceEvent::pointer_move(&surface, path, point));
            }
            TraceEvent::Leave => mode.on_pointer_leave(&SurfaceEvent::new(&surface)),
            TraceEvent::Press { button, modifiers } => {
                let modifiers = modifiers
                    .iter()
                    .fold(Modifiers::empty(), |acc, key| acc | key.flag());
                mode.on_button_press(&SurfaceEvent::button_press(&surface, *button, modifiers));
            }
            TraceEvent::Mode { edit_mode, custom_mode } => {
                if let Some(edit_mode) = edit_mode {
                    surface.set_edit_mode(*edit_mode);
                }
                if let Some(custom_mode) = custom_mode {
                    surface.set_active_custom_mode(ModeId(*custom_mode));
                }
                mode.on_scene_mode_changed(&SurfaceEvent::new(&surface));
            }
        }
    }

    Ok(ReplayReport {
        points: mode.selected_points(),
        redraws: surface.redraw_count(),
    })
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let config = super::config::load(args.config.as_deref())?;
    let content = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("Failed to read trace {}", args.trace))?;
    let trace: Trace = toml::from_str(&content)
        .with_context(|| format!("Failed to parse trace {}", args.trace))?;

    log::info!(
        "replaying {} events over {} meshes",
        trace.events.len(),
        trace.meshes.len()
    );
    let report = replay(&trace, config)?;

    for p in &report.points {
        println!("{} {} {}", p.x, p.y, p.z);
    }
    println!("redraws: {}", report.redraws);
    Ok(())
}
