use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BUILTIN: &str = include_str!("../data/solar_system.yaml");

/// Ring segment bounds. Two vertices per segment edge must fit `u16` indices.
pub const RING_SEGMENTS: std::ops::RangeInclusive<u32> = 3..=32766;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse catalog {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_yaml::Error,
    },
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// The central body. Drawn unlit and carries the point light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSpec {
    pub name: String,
    pub radius: f32,
    pub map: String,
}

/// One planet. Which optional textures are present decides its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSpec {
    pub name: String,
    pub radius: f32,
    /// Spin about its own axis, radians per tick.
    pub rotation_speed: f32,
    /// Revolution around the sun, radians per tick.
    pub orbit_speed: f32,
    pub map: String,
    #[serde(default)]
    pub bump: Option<String>,
    #[serde(default)]
    pub specular: Option<String>,
    #[serde(default)]
    pub ring: Option<String>,
    #[serde(default)]
    pub bump_scale: f32,
    #[serde(default)]
    pub moons: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonSpec {
    pub radius: f32,
    pub map: String,
    pub bump: String,
    pub bump_scale: f32,
}

impl Default for MoonSpec {
    fn default() -> Self {
        Self {
            radius: 0.01738,
            map: "moon_1024.jpg".into(),
            bump: "moon_bump.jpg".into(),
            bump_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidSpec {
    pub radius: f32,
    pub map: String,
}

impl Default for AsteroidSpec {
    fn default() -> Self {
        Self {
            radius: 0.02,
            map: "asteroidmap.jpg".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingSpec {
    pub inner: f32,
    pub outer: f32,
    pub segments: u32,
    pub opacity: f32,
}

impl Default for RingSpec {
    fn default() -> Self {
        Self {
            inner: 0.08,
            outer: 0.15,
            segments: 70,
            opacity: 0.8,
        }
    }
}

fn default_background() -> String {
    "space.jpg".into()
}

fn default_belt_after() -> usize {
    4
}

/// Bodies of the system plus the shared moon, asteroid and ring looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub sun: StarSpec,
    pub planets: Vec<PlanetSpec>,
    /// The asteroid belt is built after this many planets.
    #[serde(default = "default_belt_after")]
    pub belt_after: usize,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub moon: MoonSpec,
    #[serde(default)]
    pub asteroid: AsteroidSpec,
    #[serde(default)]
    pub ring: RingSpec,
}

impl Catalog {
    /// The catalog compiled into the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN, "<builtin>")
    }

    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(text).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&text, &path.display().to_string())?;
        tracing::info!(path = %path.display(), planets = catalog.planets.len(), "catalog loaded");
        Ok(catalog)
    }

    /// A file catalog when given, the built-in one otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.planets.is_empty() {
            return Err(CatalogError::Invalid("no planets".into()));
        }
        if self.belt_after > self.planets.len() {
            return Err(CatalogError::Invalid(format!(
                "belt_after {} exceeds {} planets",
                self.belt_after,
                self.planets.len()
            )));
        }
        let radii = std::iter::once((&self.sun.name, self.sun.radius))
            .chain(self.planets.iter().map(|p| (&p.name, p.radius)));
        for (name, radius) in radii {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(CatalogError::Invalid(format!("{name} has radius {radius}")));
            }
        }
        let ring = &self.ring;
        if !ring.inner.is_finite()
            || !ring.outer.is_finite()
            || ring.inner <= 0.0
            || ring.inner >= ring.outer
        {
            return Err(CatalogError::Invalid(format!(
                "ring inner {} must be positive and below outer {}",
                ring.inner, ring.outer
            )));
        }
        if !RING_SEGMENTS.contains(&ring.segments) {
            return Err(CatalogError::Invalid(format!(
                "ring segments {} outside {}..={}",
                ring.segments,
                RING_SEGMENTS.start(),
                RING_SEGMENTS.end()
            )));
        }
        if !(0.0..=1.0).contains(&ring.opacity) {
            return Err(CatalogError::Invalid(format!(
                "ring opacity {} outside 0..=1",
                ring.opacity
            )));
        }
        Ok(())
    }

    pub fn total_moons(&self) -> u32 {
        self.planets.iter().map(|p| p.moons).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.sun.name, "Sun");
        assert_eq!(catalog.sun.radius, 2.0);
        let names: Vec<&str> = catalog.planets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
                "Pluto"
            ]
        );
        assert_eq!(catalog.total_moons(), 57);
        assert_eq!(catalog.belt_after, 4);
        assert_eq!(catalog.background, "space.jpg");
    }

    #[test]
    fn optional_textures() {
        let catalog = Catalog::builtin().unwrap();
        let earth = &catalog.planets[2];
        assert_eq!(earth.specular.as_deref(), Some("earth_specular_spec_1k.jpg"));
        let saturn = &catalog.planets[5];
        assert_eq!(saturn.ring.as_deref(), Some("saturnringcolor.jpg"));
        assert!(saturn.bump.is_none());
        let jupiter = &catalog.planets[4];
        assert_eq!(jupiter.bump_scale, 0.0);
    }

    #[test]
    fn shared_looks_default() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.moon, MoonSpec::default());
        assert_eq!(catalog.asteroid, AsteroidSpec::default());
        assert_eq!(catalog.ring, RingSpec::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.yaml");
        std::fs::write(
            &path,
            "sun: { name: Star, radius: 1.0, map: star.jpg }\n\
             belt_after: 1\n\
             planets:\n  - { name: Rock, radius: 0.5, rotation_speed: 0.1, orbit_speed: 0.01, map: rock.jpg, moons: 2 }\n",
        )
        .unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.planets.len(), 1);
        assert_eq!(catalog.total_moons(), 2);
        assert_eq!(catalog.background, "space.jpg");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Catalog::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn bad_yaml_is_parse_error() {
        let err = Catalog::from_yaml("sun: [", "test").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn belt_past_last_planet_is_invalid() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.belt_after = 10;
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn swapped_ring_radii_are_invalid() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.ring.inner = 0.15;
        catalog.ring.outer = 0.08;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn ring_radii_must_be_finite() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.ring.inner = f32::NAN;
        assert!(catalog.validate().is_err());

        let mut catalog = Catalog::builtin().unwrap();
        catalog.ring.outer = f32::INFINITY;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn ring_segments_fit_u16_indices() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.ring.segments = 40_000;
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));
        catalog.ring.segments = 2;
        assert!(catalog.validate().is_err());

        catalog.ring.segments = *RING_SEGMENTS.end();
        catalog.validate().unwrap();
        let r = &catalog.ring;
        crate::geometry::ring(r.inner, r.outer, r.segments).validate().unwrap();
    }

    #[test]
    fn ring_opacity_is_a_fraction() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.ring.opacity = 7.0;
        assert!(catalog.validate().is_err());
        catalog.ring.opacity = f32::NAN;
        assert!(catalog.validate().is_err());
        catalog.ring.opacity = 1.0;
        catalog.validate().unwrap();
    }
}
