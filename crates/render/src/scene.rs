use crate::canvas::DrawList2d;
use crate::mesh::{MeshData, MeshError};
use glam::{Mat4, Vec3};
use sketchbook_common::Color;

/// Index of a mesh in [`SceneAssets::meshes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshKey(pub u32);

/// Index of a material in [`SceneAssets::materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialKey(pub u32);

/// Surface description for lit meshes. Textures are asset-relative paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub albedo: Option<String>,
    pub bump: Option<String>,
    pub specular: Option<String>,
    pub bump_scale: f32,
    pub shininess: f32,
    pub specular_color: Color,
    pub opacity: f32,
    /// Ignore lighting and show the albedo as-is.
    pub unlit: bool,
    /// Draw both faces and blend with what is behind.
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            albedo: None,
            bump: None,
            specular: None,
            bump_scale: 1.0,
            shininess: 30.0,
            specular_color: Color::from_hex(0x111111),
            opacity: 1.0,
            unlit: false,
            transparent: false,
        }
    }
}

/// A polyline in world space, drawn unlit.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStrip {
    pub points: Vec<Vec3>,
    pub color: Color,
}

impl LineStrip {
    /// Pairs of points for a line-list topology.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Static resources a 3D sketch uploads once at start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneAssets {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<Material>,
    pub lines: Vec<LineStrip>,
    /// Texture stretched over the whole viewport behind everything else.
    pub background: Option<String>,
}

impl SceneAssets {
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshKey {
        let key = MeshKey(self.meshes.len() as u32);
        tracing::debug!(
            mesh = key.0,
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "mesh added"
        );
        self.meshes.push(mesh);
        key
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.push(material);
        MaterialKey(self.materials.len() as u32 - 1)
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&MeshData> {
        self.meshes.get(key.0 as usize)
    }

    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key.0 as usize)
    }

    /// Validate every mesh; reports the first failure with its key.
    pub fn validate(&self) -> Result<(), (MeshKey, MeshError)> {
        for (i, mesh) in self.meshes.iter().enumerate() {
            if let Err(e) = mesh.validate() {
                tracing::warn!(mesh = i, "invalid mesh: {e}");
                return Err((MeshKey(i as u32), e));
            }
        }
        Ok(())
    }

    /// Every texture path referenced by materials and the background.
    pub fn texture_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .materials
            .iter()
            .flat_map(|m| [&m.albedo, &m.bump, &m.specular])
            .filter_map(|p| p.as_deref())
            .chain(self.background.as_deref())
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub point: Option<PointLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            ambient_intensity: 1.0,
            point: None,
        }
    }
}

/// One mesh instance to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKey,
    /// Required for lit meshes; ignored for colored ones.
    pub material: Option<MaterialKey>,
    pub model: Mat4,
}

/// Everything a 3D sketch draws in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub clear: Color,
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub lighting: Lighting,
    pub draws: Vec<DrawItem>,
}

/// What a sketch hands to a renderer each redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Canvas(DrawList2d),
    Scene(SceneFrame),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{ColorVertex, IndexedMesh};

    fn tri() -> MeshData {
        let v = ColorVertex {
            position: [0.0; 3],
            color: [1.0; 4],
        };
        MeshData::Colored(IndexedMesh::new(vec![v; 3], vec![0, 1, 2]))
    }

    #[test]
    fn keys_are_sequential() {
        let mut assets = SceneAssets::default();
        assert_eq!(assets.add_mesh(tri()), MeshKey(0));
        assert_eq!(assets.add_mesh(tri()), MeshKey(1));
        assert_eq!(assets.add_material(Material::default()), MaterialKey(0));
        assert!(assets.mesh(MeshKey(1)).is_some());
        assert!(assets.mesh(MeshKey(2)).is_none());
    }

    #[test]
    fn added_mesh_is_found_under_its_key() {
        let mut assets = SceneAssets::default();
        assets.add_mesh(tri());
        let v = ColorVertex {
            position: [0.0; 3],
            color: [1.0; 4],
        };
        let quad = IndexedMesh::new(vec![v; 4], vec![0, 1, 2, 0, 2, 3]);
        let key = assets.add_mesh(MeshData::Colored(quad));
        let mesh = assets.mesh(key).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn validate_reports_offending_mesh() {
        let mut assets = SceneAssets::default();
        assets.add_mesh(tri());
        let v = ColorVertex {
            position: [0.0; 3],
            color: [1.0; 4],
        };
        assets.add_mesh(MeshData::Colored(IndexedMesh::new(vec![v; 3], vec![0, 1, 9])));
        let (key, _) = assets.validate().unwrap_err();
        assert_eq!(key, MeshKey(1));
    }

    #[test]
    fn texture_paths_are_deduplicated() {
        let mut assets = SceneAssets {
            background: Some("space.jpg".into()),
            ..Default::default()
        };
        for _ in 0..3 {
            assets.add_material(Material {
                albedo: Some("moon.jpg".into()),
                bump: Some("moon_bump.jpg".into()),
                ..Material::default()
            });
        }
        assert_eq!(
            assets.texture_paths(),
            vec!["moon.jpg", "moon_bump.jpg", "space.jpg"]
        );
    }

    #[test]
    fn line_strip_segments() {
        let strip = LineStrip {
            points: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            color: Color::WHITE,
        };
        assert_eq!(strip.segments().count(), 2);
    }
}
