use glam::{Mat4, Vec3};

/// How a draw item is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Opaque geometry lit by the scene lights.
    Lit,
    /// Opaque, flat-coloured light marker.
    Unlit,
    /// Alpha-blended grass quad. Drawn last, in list order.
    Billboard,
}

/// One instanced draw: a unit mesh placed by `model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub model: Mat4,
    pub color: [f32; 4],
}

impl DrawItem {
    pub fn new(kind: DrawKind, model: Mat4, color: [f32; 4]) -> Self {
        Self { kind, model, color }
    }

    pub fn translation(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Static set dressing around the corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub clear_color: [f32; 4],
    /// Centre and full extents of the ground slab.
    pub ground: (Vec3, Vec3),
    pub ground_color: [f32; 4],
    /// Centre and full extents of each curb.
    pub curbs: [(Vec3, Vec3); 2],
    pub curb_color: [f32; 4],
    /// Centre and uniform scale of each crate.
    pub boxes: Vec<(Vec3, f32)>,
    pub box_color: [f32; 4],
    pub point_lights: [PointLight; 4],
    /// Radius and angular speed of the first light's orbit around the origin.
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub marker_scale: f32,
    pub billboard_size: f32,
    pub grass_color: [f32; 4],
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            clear_color: [0.53, 0.81, 0.92, 1.0],
            ground: (Vec3::new(0.0, -0.05, -15.0), Vec3::new(5.0, 0.1, 50.0)),
            ground_color: [0.36, 0.55, 0.27, 1.0],
            curbs: [
                (Vec3::new(-2.75, 0.1, -15.0), Vec3::new(0.5, 0.3, 50.0)),
                (Vec3::new(2.75, 0.1, -15.0), Vec3::new(0.5, 0.3, 50.0)),
            ],
            curb_color: [0.6, 0.6, 0.58, 1.0],
            boxes: vec![
                (Vec3::new(1.0, 1.0, -1.0), 2.0),
                (Vec3::new(-1.0, 0.5, 2.0), 1.0),
            ],
            box_color: [0.62, 0.45, 0.26, 1.0],
            point_lights: [
                PointLight {
                    position: Vec3::new(0.7, 1.0, 1.5),
                    color: [1.0, 0.0, 0.0],
                },
                PointLight {
                    position: Vec3::new(2.3, 3.0, -4.0),
                    color: [1.0, 0.0, 1.0],
                },
                PointLight {
                    position: Vec3::new(-4.0, 2.0, 1.0),
                    color: [0.0, 0.0, 1.0],
                },
                PointLight {
                    position: Vec3::new(1.4, 2.0, 1.3),
                    color: [0.0, 1.0, 0.0],
                },
            ],
            orbit_radius: 5.0,
            orbit_speed: 0.5,
            marker_scale: 0.2,
            billboard_size: 1.0,
            grass_color: [0.25, 0.7, 0.2, 1.0],
        }
    }
}

/// Point-light positions at `time` seconds. The first light orbits the origin
/// in the XZ plane at its configured height; the rest are fixed.
pub fn light_positions(layout: &SceneLayout, time: f32) -> [Vec3; 4] {
    let mut positions = layout.point_lights.map(|l| l.position);
    let angle = layout.orbit_speed * time;
    positions[0].x = layout.orbit_radius * angle.sin();
    positions[0].z = layout.orbit_radius * angle.cos();
    positions
}

/// Position of the white directional-light marker at `time` seconds.
pub fn directional_marker(time: f32) -> Vec3 {
    Vec3::new(2.0 * time.sin(), 2.5, 2.0)
}

/// Farthest first. A stable sort, so points at equal distance keep their order.
pub fn sort_back_to_front(eye: Vec3, points: impl IntoIterator<Item = Vec3>) -> Vec<Vec3> {
    let mut keyed: Vec<(f32, Vec3)> = points
        .into_iter()
        .map(|p| (p.distance_squared(eye), p))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Everything one frame draws, grouped by pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameScene {
    pub clear_color: [f32; 4],
    pub lights: Vec<PointLight>,
    pub opaque: Vec<DrawItem>,
    pub markers: Vec<DrawItem>,
    pub billboards: Vec<DrawItem>,
}

impl FrameScene {
    pub fn build(
        layout: &SceneLayout,
        eye: Vec3,
        obstacles: impl IntoIterator<Item = Vec3>,
        time: f32,
    ) -> Self {
        let mut opaque = Vec::with_capacity(3 + layout.boxes.len());
        let (center, extent) = layout.ground;
        opaque.push(DrawItem::new(
            DrawKind::Lit,
            Mat4::from_scale_rotation_translation(extent, glam::Quat::IDENTITY, center),
            layout.ground_color,
        ));
        for (center, extent) in layout.curbs {
            opaque.push(DrawItem::new(
                DrawKind::Lit,
                Mat4::from_scale_rotation_translation(extent, glam::Quat::IDENTITY, center),
                layout.curb_color,
            ));
        }
        for &(center, scale) in &layout.boxes {
            opaque.push(DrawItem::new(
                DrawKind::Lit,
                Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(scale)),
                layout.box_color,
            ));
        }

        let lit_positions = light_positions(layout, time);
        let lights: Vec<PointLight> = layout
            .point_lights
            .iter()
            .zip(lit_positions)
            .map(|(l, position)| PointLight {
                position,
                color: l.color,
            })
            .collect();

        let marker = Mat4::from_scale(Vec3::splat(layout.marker_scale));
        let mut markers: Vec<DrawItem> = lights
            .iter()
            .map(|l| {
                let [r, g, b] = l.color;
                DrawItem::new(
                    DrawKind::Unlit,
                    Mat4::from_translation(l.position) * marker,
                    [r, g, b, 1.0],
                )
            })
            .collect();
        markers.push(DrawItem::new(
            DrawKind::Unlit,
            Mat4::from_translation(directional_marker(time)) * marker,
            [1.0; 4],
        ));

        let quad = Mat4::from_scale(Vec3::splat(layout.billboard_size));
        let billboards: Vec<DrawItem> = sort_back_to_front(eye, obstacles)
            .into_iter()
            .map(|p| {
                DrawItem::new(
                    DrawKind::Billboard,
                    Mat4::from_translation(p) * quad,
                    layout.grass_color,
                )
            })
            .collect();

        tracing::trace!(
            opaque = opaque.len(),
            markers = markers.len(),
            billboards = billboards.len(),
            "built frame scene"
        );

        Self {
            clear_color: layout.clear_color,
            lights,
            opaque,
            markers,
            billboards,
        }
    }

    pub fn draw_count(&self) -> usize {
        self.opaque.len() + self.markers.len() + self.billboards.len()
    }
}
