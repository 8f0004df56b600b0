// SPDX-License-Identifier: MPL-2.0
//! Interactive 3D view of the backpack.
//!
//! [`ViewerContent`] is a cheap-to-clone snapshot of what to draw, kept in
//! sync with the [`Configurator`] by [`ViewerContent::sync`]. The widget
//! itself is an iced `shader` program with an orbit camera: drag to rotate,
//! right-drag to pan, scroll to zoom. Until a scene is loaded it draws a
//! grey placeholder cube.

pub mod camera;
mod pipeline;

pub use camera::OrbitCamera;
pub use pipeline::Primitive;

use crate::configurator::Configurator;
use crate::domain::Rgb;
use crate::material::{PbrMaterial, TextureImage, TextureKey};
use crate::scene::{Geometry, SceneGraph, SceneId};
use glam::{Mat4, Vec3};
use iced::widget::shader;
use iced::{mouse, Element, Event, Length, Point, Rectangle};
use std::sync::Arc;

/// Fixed light rig.
pub mod lighting {
    use glam::Vec3;

    pub const AMBIENT_INTENSITY: f32 = 2.0;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DirectionalLight {
        /// Light position; it shines towards the origin.
        pub position: Vec3,
        pub intensity: f32,
    }

    pub const DIRECTIONAL: [DirectionalLight; 3] = [
        DirectionalLight {
            position: Vec3::new(5.0, 5.0, 5.0),
            intensity: 1.0,
        },
        DirectionalLight {
            position: Vec3::new(-5.0, 5.0, -5.0),
            intensity: 0.5,
        },
        DirectionalLight {
            position: Vec3::new(0.0, 5.0, -5.0),
            intensity: 0.3,
        },
    ];
}

/// Offset applied to the loaded model so it sits centered in the frame.
pub const MODEL_OFFSET: Vec3 = Vec3::new(0.0, -0.25, 0.0);

/// Placeholder cube edge length.
pub const PLACEHOLDER_SIZE: f32 = 1.0;

/// Shading inputs of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Linear RGB tint.
    pub tint: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub normal_scale: [f32; 2],
    /// Base color, normal and ORM textures; `None` renders untextured.
    pub textures: Option<[TextureKey; 3]>,
}

impl Surface {
    /// Flat grey, fully rough and non-metallic.
    pub fn placeholder() -> Self {
        Self {
            tint: Rgb::new(0x80, 0x80, 0x80).to_linear(),
            metalness: 0.0,
            roughness: 1.0,
            normal_scale: [1.0, 1.0],
            textures: None,
        }
    }
}

impl From<&PbrMaterial> for Surface {
    fn from(material: &PbrMaterial) -> Self {
        Self {
            tint: material.tint.to_linear(),
            metalness: material.metalness,
            roughness: material.roughness,
            normal_scale: material.normal_scale,
            textures: Some(material.textures()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawMesh {
    pub geometry: Arc<Geometry>,
    pub world: Mat4,
    pub surface: Surface,
}

/// Identity of the uploaded geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKey {
    Placeholder,
    Scene(SceneId),
}

#[derive(Debug, Clone)]
pub struct Model {
    pub key: ModelKey,
    pub meshes: Arc<Vec<DrawMesh>>,
}

impl Model {
    fn placeholder() -> Self {
        Self {
            key: ModelKey::Placeholder,
            meshes: Arc::new(vec![DrawMesh {
                geometry: Arc::new(Geometry::cube(PLACEHOLDER_SIZE)),
                world: Mat4::IDENTITY,
                surface: Surface::placeholder(),
            }]),
        }
    }

    fn from_scene(scene: &SceneGraph) -> Self {
        let meshes = scene
            .meshes()
            .into_iter()
            .map(|mesh| DrawMesh {
                geometry: Arc::clone(mesh.geometry()),
                world: mesh.world(),
                surface: mesh.material().map_or_else(Surface::placeholder, Surface::from),
            })
            .collect();
        Self {
            key: ModelKey::Scene(scene.id()),
            meshes: Arc::new(meshes),
        }
    }

    /// Transform applied on top of every mesh's world matrix.
    pub fn transform(&self) -> Mat4 {
        match self.key {
            ModelKey::Placeholder => Mat4::IDENTITY,
            ModelKey::Scene(_) => Mat4::from_translation(MODEL_OFFSET),
        }
    }
}

/// Snapshot of everything the viewer draws.
#[derive(Debug, Clone)]
pub struct ViewerContent {
    model: Model,
    textures: Arc<Vec<(TextureKey, TextureImage)>>,
    texture_revision: u64,
    material_pass: u64,
}

impl Default for ViewerContent {
    fn default() -> Self {
        Self {
            model: Model::placeholder(),
            textures: Arc::new(Vec::new()),
            texture_revision: 0,
            material_pass: 0,
        }
    }
}

impl ViewerContent {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn textures(&self) -> &[(TextureKey, TextureImage)] {
        &self.textures
    }

    pub fn is_placeholder(&self) -> bool {
        self.model.key == ModelKey::Placeholder
    }

    /// Refreshes the snapshot from the configurator. Returns whether
    /// anything changed.
    pub fn sync(&mut self, configurator: &Configurator) -> bool {
        let mut changed = false;

        match configurator.scene() {
            Some(scene) => {
                let pass = configurator.synthesizer().passes();
                if self.model.key != ModelKey::Scene(scene.id()) || self.material_pass != pass {
                    self.model = Model::from_scene(scene);
                    self.material_pass = pass;
                    changed = true;
                }
            }
            None if !self.is_placeholder() => {
                self.model = Model::placeholder();
                changed = true;
            }
            None => {}
        }

        let revision = configurator.texture_revision();
        if self.texture_revision != revision {
            self.textures = Arc::new(configurator.ready_textures());
            self.texture_revision = revision;
            changed = true;
        }

        changed
    }
}

/// Shader program drawing a [`ViewerContent`].
#[derive(Debug, Clone)]
pub struct ModelViewer {
    content: ViewerContent,
}

impl ModelViewer {
    pub fn new(content: &ViewerContent) -> Self {
        Self {
            content: content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Dragging {
    #[default]
    None,
    Rotate,
    Pan,
}

#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    camera: OrbitCamera,
    dragging: Dragging,
    last_cursor: Option<Point>,
}

impl ViewerState {
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    fn start_drag(&mut self, mode: Dragging, at: Point) {
        self.dragging = mode;
        self.last_cursor = Some(at);
    }

    fn stop_drag(&mut self) {
        self.dragging = Dragging::None;
        self.last_cursor = None;
    }

    /// Applies a cursor move while dragging. Returns false when idle.
    fn drag_to(&mut self, at: Point, bounds: Rectangle) -> bool {
        let Some(last) = self.last_cursor else {
            return false;
        };
        let dx = at.x - last.x;
        let dy = at.y - last.y;
        match self.dragging {
            Dragging::None => return false,
            Dragging::Rotate => self.camera.rotate(dx, dy, bounds.width, bounds.height),
            Dragging::Pan => self.camera.pan(dx, dy, bounds.height),
        }
        self.last_cursor = Some(at);
        true
    }
}

impl<Message> shader::Program<Message> for ModelViewer {
    type State = ViewerState;
    type Primitive = Primitive;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<shader::Action<Message>> {
        let redraw = || Some(shader::Action::request_redraw().and_capture());

        let Some(position) = cursor.position_in(bounds) else {
            // Releasing outside the widget still ends the drag.
            if let Event::Mouse(mouse::Event::ButtonReleased(_)) = event {
                if state.dragging != Dragging::None {
                    state.stop_drag();
                    return redraw();
                }
            }
            return None;
        };

        match event {
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let lines = match *delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / 120.0,
                };
                if lines.abs() > f32::EPSILON {
                    state.camera.zoom(lines);
                    return redraw();
                }
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                state.start_drag(Dragging::Rotate, position);
                return redraw();
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                state.start_drag(Dragging::Pan, position);
                return redraw();
            }
            Event::Mouse(mouse::Event::ButtonReleased(
                mouse::Button::Left | mouse::Button::Right,
            )) => {
                if state.dragging != Dragging::None {
                    state.stop_drag();
                    return redraw();
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.drag_to(position, bounds) {
                    return redraw();
                }
            }
            _ => {}
        }

        None
    }

    fn draw(&self, state: &Self::State, _cursor: mouse::Cursor, _bounds: Rectangle) -> Primitive {
        Primitive {
            camera: state.camera,
            content: self.content.clone(),
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.position_in(bounds).is_none() {
            mouse::Interaction::default()
        } else if state.dragging != Dragging::None {
            mouse::Interaction::Grabbing
        } else {
            mouse::Interaction::Grab
        }
    }
}

/// Builds the viewer widget filling its container.
pub fn view<'a, Message: 'a>(content: &ViewerContent) -> Element<'a, Message> {
    shader::Shader::new(ModelViewer::new(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
