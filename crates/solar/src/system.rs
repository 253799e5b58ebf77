use crate::catalog::{Catalog, PlanetSpec};
use crate::geometry::{circle_xz, ring, sphere};
use crate::graph::{NodeId, NodeKind, SceneGraph};
use glam::Vec3;
use sketchbook_common::{Color, SplitMix64, Transform};
use sketchbook_render::{
    DrawItem, Lighting, LineStrip, Material, MaterialKey, MeshData, MeshKey, PointLight,
    SceneAssets,
};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Spacing between planet slots along X and Z.
const PLANET_SPACING: f32 = 0.2;
/// Asteroid belt radius per planet built before it.
const BELT_SPACING: f32 = 0.28;
const ORBIT_LINE_SPACING: f32 = 0.285;
const ORBIT_LINE_SEGMENTS: u32 = 50;
/// Planets beyond the belt sit further out along X.
const INNER_OFFSET: f32 = 1.0;
const OUTER_OFFSET: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    pub asteroids: u32,
    pub sphere_segments: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            asteroids: 50,
            sphere_segments: 32,
        }
    }
}

/// Node handles for one planet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetNodes {
    pub name: String,
    /// Group at the origin whose spin carries the planet around the sun.
    pub orbit: NodeId,
    /// Positioned group holding the body and the moon pivot.
    pub group: NodeId,
    pub body: NodeId,
    pub pivot: NodeId,
    pub moons: Vec<NodeId>,
    pub ring: Option<NodeId>,
}

/// A built solar system: scene graph, GPU-ready assets and spin schedule.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    graph: SceneGraph,
    assets: SceneAssets,
    sun: NodeId,
    planets: Vec<PlanetNodes>,
    asteroid_groups: Vec<NodeId>,
    asteroid_orbits: Vec<NodeId>,
    moon_bodies: Vec<NodeId>,
    orbit_speeds: Vec<(NodeId, f32)>,
    rotation_speeds: Vec<(NodeId, f32)>,
    ambient: Color,
    ambient_intensity: f32,
}

impl SolarSystem {
    /// Build the scene graph for `catalog`. `rng` places moons and asteroids.
    pub fn build(catalog: &Catalog, options: BuildOptions, rng: &mut SplitMix64) -> Self {
        let mut builder = Builder {
            catalog,
            options,
            graph: SceneGraph::new(),
            assets: SceneAssets::default(),
            planets: Vec::new(),
            asteroid_groups: Vec::new(),
            asteroid_orbits: Vec::new(),
            moon_bodies: Vec::new(),
            moon_look: None,
        };

        let sun = builder.add_sun();
        for (index, planet) in catalog.planets.iter().enumerate() {
            builder.add_planet(planet, index < catalog.belt_after, rng);
            if index + 1 == catalog.belt_after {
                builder.add_asteroid_belt(rng);
            }
        }
        builder.add_orbit_lines();
        builder.assets.background = Some(catalog.background.clone());

        let Builder {
            graph,
            assets,
            planets,
            asteroid_groups,
            asteroid_orbits,
            moon_bodies,
            ..
        } = builder;

        let orbit_speeds = planets
            .iter()
            .zip(&catalog.planets)
            .map(|(nodes, spec)| (nodes.orbit, spec.orbit_speed))
            .collect();
        let rotation_speeds = planets
            .iter()
            .zip(&catalog.planets)
            .map(|(nodes, spec)| (nodes.body, spec.rotation_speed))
            .collect();

        tracing::debug!(
            nodes = graph.len(),
            planets = planets.len(),
            moons = moon_bodies.len(),
            asteroids = asteroid_groups.len(),
            meshes = assets.meshes.len(),
            "solar system built"
        );

        Self {
            graph,
            assets,
            sun,
            planets,
            asteroid_groups,
            asteroid_orbits,
            moon_bodies,
            orbit_speeds,
            rotation_speeds,
            ambient: Color::from_hex(0xffccaa),
            ambient_intensity: 0.4,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn assets(&self) -> &SceneAssets {
        &self.assets
    }

    pub fn sun(&self) -> NodeId {
        self.sun
    }

    pub fn planets(&self) -> &[PlanetNodes] {
        &self.planets
    }

    pub fn planet(&self, name: &str) -> Option<&PlanetNodes> {
        self.planets.iter().find(|p| p.name == name)
    }

    pub fn moon_count(&self) -> usize {
        self.moon_bodies.len()
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroid_groups.len()
    }

    /// Advance one tick of `dt` seconds. `duration` is the time for the
    /// shared spin term to complete a full turn.
    ///
    /// Planet pivots, moons and asteroids get a random jitter on top of the
    /// shared term; orbit groups and bodies turn at their catalog speeds.
    pub fn animate(&mut self, dt: f32, duration: f32, rng: &mut SplitMix64) {
        let angle = TAU * dt / duration;
        for pivot in self.planets.iter().map(|p| p.pivot) {
            self.graph.rotate_y(pivot, rng.range_f32(0.02, 0.05) + angle);
        }
        for &moon in &self.moon_bodies {
            self.graph.rotate_y(moon, rng.range_f32(0.05, 0.10) + angle);
        }
        for &group in &self.asteroid_groups {
            self.graph.rotate_y(group, rng.range_f32(0.05, 0.10) + angle);
        }
        for &orbit in &self.asteroid_orbits {
            self.graph.rotate_y(orbit, rng.range_f32(1e-8, 1.1e-7) + angle);
        }
        for &(orbit, speed) in &self.orbit_speeds {
            self.graph.rotate_y(orbit, speed);
        }
        for &(body, speed) in &self.rotation_speeds {
            self.graph.rotate_y(body, speed);
        }
    }

    /// One draw per mesh node, in graph order.
    pub fn draws(&self) -> Vec<DrawItem> {
        let world = self.graph.world_matrices();
        self.graph
            .nodes()
            .filter_map(|(id, node)| match node.kind {
                NodeKind::Mesh { mesh, material } => Some(DrawItem {
                    mesh,
                    material: Some(material),
                    model: world[id.0],
                }),
                _ => None,
            })
            .collect()
    }

    pub fn lighting(&self) -> Lighting {
        let point = self.graph.nodes().find_map(|(id, node)| match node.kind {
            NodeKind::Light { color, intensity } => Some(PointLight {
                position: self.graph.world_matrix(id).transform_point3(Vec3::ZERO),
                color,
                intensity,
            }),
            _ => None,
        });
        Lighting {
            ambient: self.ambient,
            ambient_intensity: self.ambient_intensity,
            point,
        }
    }

    /// World position of a node.
    pub fn position_of(&self, id: NodeId) -> Vec3 {
        self.graph.world_matrix(id).transform_point3(Vec3::ZERO)
    }
}

struct Builder<'a> {
    catalog: &'a Catalog,
    options: BuildOptions,
    graph: SceneGraph,
    assets: SceneAssets,
    planets: Vec<PlanetNodes>,
    asteroid_groups: Vec<NodeId>,
    asteroid_orbits: Vec<NodeId>,
    moon_bodies: Vec<NodeId>,
    /// Shared moon mesh and material, created on first use.
    moon_look: Option<(MeshKey, MaterialKey)>,
}

impl Builder<'_> {
    fn sphere(&mut self, radius: f32) -> MeshKey {
        let segments = self.options.sphere_segments;
        self.assets
            .add_mesh(MeshData::Lit(sphere(radius, segments, segments)))
    }

    fn add_sun(&mut self) -> NodeId {
        let catalog = self.catalog;
        let spec = &catalog.sun;
        let mesh = self.sphere(spec.radius / 10.0);
        let material = self.assets.add_material(Material {
            name: spec.name.clone(),
            albedo: Some(spec.map.clone()),
            unlit: true,
            ..Material::default()
        });
        let name = spec.name.clone();

        let group = self
            .graph
            .add_node(None, name.clone(), Transform::default(), NodeKind::Empty);
        let body = self.graph.add_node(
            Some(group),
            format!("{name} body"),
            Transform::default(),
            NodeKind::Mesh { mesh, material },
        );
        self.graph.add_node(
            Some(group),
            format!("{name} pivot"),
            Transform::default(),
            NodeKind::Empty,
        );
        self.graph.add_node(
            Some(body),
            format!("{name} light"),
            Transform::default(),
            NodeKind::Light {
                color: Color::WHITE,
                intensity: 1.3,
            },
        );
        group
    }

    fn planet_material(spec: &PlanetSpec) -> Material {
        let mut material = Material {
            name: spec.name.clone(),
            albedo: Some(spec.map.clone()),
            ..Material::default()
        };
        if let Some(bump) = &spec.bump {
            material.bump = Some(bump.clone());
            material.bump_scale = spec.bump_scale;
            match &spec.specular {
                Some(specular) => {
                    material.specular = Some(specular.clone());
                    material.specular_color = Color::from_hex(0x808080);
                    material.shininess = 50.0;
                }
                None => material.shininess = 1.0,
            }
        }
        material
    }

    fn add_planet(&mut self, spec: &PlanetSpec, inside_belt: bool, rng: &mut SplitMix64) {
        let slot = self.planets.len() as f32;
        let offset = if inside_belt {
            INNER_OFFSET
        } else {
            OUTER_OFFSET
        };
        let position = Vec3::new(
            PLANET_SPACING * (slot + offset),
            0.0,
            PLANET_SPACING * (slot + 1.0),
        );

        let mesh = self.sphere(spec.radius / 10.0);
        let material = self.assets.add_material(Self::planet_material(spec));
        let name = &spec.name;

        let orbit = self.graph.add_node(
            None,
            format!("{name} orbit"),
            Transform::default(),
            NodeKind::Empty,
        );
        let group = self.graph.add_node(
            Some(orbit),
            name.clone(),
            Transform::from_position(position),
            NodeKind::Empty,
        );
        self.graph.add_node(
            Some(orbit),
            format!("{name} orbit pivot"),
            Transform::default(),
            NodeKind::Empty,
        );
        let body = self.graph.add_node(
            Some(group),
            format!("{name} body"),
            Transform::default(),
            NodeKind::Mesh { mesh, material },
        );
        let pivot = self.graph.add_node(
            Some(group),
            format!("{name} pivot"),
            Transform::default(),
            NodeKind::Empty,
        );

        let moons = (0..spec.moons)
            .map(|i| self.add_moon(pivot, &format!("{name} moon {i}"), rng))
            .collect();

        let ring = spec.ring.as_ref().map(|texture| self.add_ring(body, name, texture));

        tracing::debug!(planet = %name, x = position.x, z = position.z, moons = spec.moons, "planet placed");
        self.planets.push(PlanetNodes {
            name: name.clone(),
            orbit,
            group,
            body,
            pivot,
            moons,
            ring,
        });
    }

    fn add_moon(&mut self, pivot: NodeId, name: &str, rng: &mut SplitMix64) -> NodeId {
        let (mesh, material) = match self.moon_look {
            Some(look) => look,
            None => {
                let spec = self.catalog.moon.clone();
                let mesh = self.sphere(spec.radius);
                let material = self.assets.add_material(Material {
                    name: "moon".into(),
                    albedo: Some(spec.map),
                    bump: Some(spec.bump),
                    bump_scale: spec.bump_scale,
                    ..Material::default()
                });
                self.moon_look = Some((mesh, material));
                (mesh, material)
            }
        };

        // Small integer offsets of a tenth: x and z in {-0.1, 0}, y in {-0.1 .. 0.2}.
        let mut step = |cells: f32| ((rng.next_f32() * cells).floor() - 1.0) / 10.0;
        let x = step(2.0);
        let y = step(4.0);
        let z = step(2.0);

        let group = self.graph.add_node(
            Some(pivot),
            name,
            Transform::from_position(Vec3::new(x, y, z)),
            NodeKind::Empty,
        );
        let body = self.graph.add_node(
            Some(group),
            format!("{name} body"),
            Transform::default(),
            NodeKind::Mesh { mesh, material },
        );
        self.moon_bodies.push(body);
        body
    }

    fn add_ring(&mut self, body: NodeId, planet: &str, texture: &str) -> NodeId {
        let spec = self.catalog.ring.clone();
        let mesh = self
            .assets
            .add_mesh(MeshData::Lit(ring(spec.inner, spec.outer, spec.segments)));
        let material = self.assets.add_material(Material {
            name: format!("{planet} ring"),
            albedo: Some(texture.to_string()),
            opacity: spec.opacity,
            unlit: true,
            transparent: true,
            ..Material::default()
        });
        self.graph.add_node(
            Some(body),
            format!("{planet} ring"),
            Transform::default().with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            NodeKind::Mesh { mesh, material },
        )
    }

    fn add_asteroid_belt(&mut self, rng: &mut SplitMix64) {
        let spec = self.catalog.asteroid.clone();
        let segments = self.options.sphere_segments;
        let mesh = self
            .assets
            .add_mesh(MeshData::Lit(sphere(spec.radius, segments, segments)));
        let material = self.assets.add_material(Material {
            name: "asteroid".into(),
            albedo: Some(spec.map),
            ..Material::default()
        });

        let belt = BELT_SPACING * (self.planets.len() as f32 + 1.0);
        for i in 0..self.options.asteroids {
            let a = i as f32;
            let x = belt * (a.cos() + rng.range_f32(-0.1, 0.1));
            let y = rng.range_f32(-0.1, 0.1);
            let z = belt * (a.sin() + rng.range_f32(-0.1, 0.1));

            let orbit = self.graph.add_node(
                None,
                format!("asteroid {i} orbit"),
                Transform::default(),
                NodeKind::Empty,
            );
            let group = self.graph.add_node(
                Some(orbit),
                format!("asteroid {i}"),
                Transform::from_position(Vec3::new(x, y, z)),
                NodeKind::Empty,
            );
            self.graph.add_node(
                Some(orbit),
                format!("asteroid {i} orbit pivot"),
                Transform::default(),
                NodeKind::Empty,
            );
            self.graph.add_node(
                Some(group),
                format!("asteroid {i} body"),
                Transform::default(),
                NodeKind::Mesh { mesh, material },
            );
            self.graph.add_node(
                Some(group),
                format!("asteroid {i} pivot"),
                Transform::default(),
                NodeKind::Empty,
            );
            self.asteroid_groups.push(group);
            self.asteroid_orbits.push(orbit);
        }
        tracing::debug!(count = self.options.asteroids, radius = belt, "asteroid belt");
    }

    /// One circle per planet; slots past the fourth skip one to clear the belt.
    fn add_orbit_lines(&mut self) {
        for i in 0..self.planets.len() {
            let slot = if i <= 3 { i + 1 } else { i + 2 };
            self.assets.lines.push(LineStrip {
                points: circle_xz(ORBIT_LINE_SPACING * slot as f32, ORBIT_LINE_SEGMENTS),
                color: Color::WHITE,
            });
        }
    }
}

/// Where the camera starts, relative to the sun at the origin.
pub fn initial_eye() -> Vec3 {
    Vec3::new(5.0, 2.0, -1.3)
}
