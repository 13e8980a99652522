//! Real Barranquilla-area hospital locations for realistic test fixtures.
//!
//! Coordinates are approximate hospital positions around Barranquilla,
//! Colombia, the metro area the planner was built for. The depot is the
//! UPCA supply collection center.

use hospital_planner::plan::Waypoint;

/// The trip starts and ends here.
pub fn depot() -> Waypoint {
    Waypoint::new("UPCA", "Centro de Acopio", 10.987173, -74.819437)
}

/// A named hospital with coordinates.
#[derive(Debug, Clone)]
pub struct HospitalFixture {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl HospitalFixture {
    pub const fn new(id: &'static str, name: &'static str, lat: f64, lon: f64) -> Self {
        Self { id, name, lat, lon }
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.id, self.name, self.lat, self.lon)
    }
}

pub const HOSPITALS: &[HospitalFixture] = &[
    HospitalFixture::new("H01", "Hospital General de Barranquilla", 10.974611, -74.800569),
    HospitalFixture::new("H02", "Hospital Nino Jesus", 10.964583, -74.785417),
    HospitalFixture::new("H03", "Clinica General del Norte", 10.990806, -74.788944),
    HospitalFixture::new("H04", "Camino Adelita de Char", 11.012528, -74.812222),
    HospitalFixture::new("H05", "Clinica Iberoamerica", 11.006306, -74.811028),
    HospitalFixture::new("H06", "Clinica del Caribe", 11.003722, -74.818694),
    HospitalFixture::new("H07", "Hospital Universidad del Norte", 10.918417, -74.777306),
    HospitalFixture::new("H08", "Clinica Porto Azul", 11.023611, -74.844806),
    HospitalFixture::new("H09", "Hospital de Puerto Colombia", 10.987806, -74.954722),
    HospitalFixture::new("H10", "Camino Simon Bolivar", 10.946889, -74.804139),
    HospitalFixture::new("H11", "Clinica Campbell", 10.981944, -74.793611),
    HospitalFixture::new("H12", "Hospital Metropolitano", 10.957222, -74.791667),
];

/// The first `count` hospitals as waypoints.
pub fn stops(count: usize) -> Vec<Waypoint> {
    HOSPITALS.iter().take(count).map(HospitalFixture::waypoint).collect()
}
