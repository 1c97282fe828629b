//! Earthquake sources and source sets.
//!
//! A [`Source`] is a named collection of [`Rupture`]s; a [`SourceSet`]
//! groups sources that share a [`GmmSet`] and a logic-tree weight.
//! Cluster source sets hold [`ClusterSource`]s, whose constituent faults
//! are believed to rupture jointly and whose hazard is therefore combined
//! with joint-probability rather than independent summation.
//!
//! Rupture geometry is delegated to the [`RuptureSurface`] trait; finite
//! fault surfaces live outside this crate. [`PointSurface`] provides the
//! point-source approximation, [`FixedSurface`] an exact-geometry fixture.

use std::sync::Arc;

use crate::dense::DenseKey;
use crate::errors::HazardError;
use crate::gmm::GmmSet;
use crate::site::{Location, Site};

/// The structural family of a source set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceType {
    Area,
    Cluster,
    Fault,
    Grid,
    Interface,
    Slab,
}

/// All source types, in ordinal order.
pub const ALL_SOURCE_TYPES: [SourceType; 6] = [
    SourceType::Area,
    SourceType::Cluster,
    SourceType::Fault,
    SourceType::Grid,
    SourceType::Interface,
    SourceType::Slab,
];

impl DenseKey for SourceType {
    const COUNT: usize = ALL_SOURCE_TYPES.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        ALL_SOURCE_TYPES[index]
    }
}

/// Site-to-rupture distance metrics, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distances {
    /// Joyner-Boore distance.
    pub r_jb: f64,
    /// Closest distance to the rupture plane.
    pub r_rup: f64,
    /// Distance from the surface trace, positive on the hanging wall.
    pub r_x: f64,
}

/// Geometry of a rupture plane.
///
/// Implementations must be immutable and shareable across threads.
pub trait RuptureSurface: Send + Sync {
    /// Distance metrics from this surface to a location.
    fn distance_to(&self, loc: &Location) -> Distances;

    /// Dip of the rupture plane, degrees.
    fn dip(&self) -> f64;

    /// Down-dip width of the rupture plane, km.
    fn width(&self) -> f64;

    /// Depth to the top of the rupture plane, km.
    fn depth(&self) -> f64;
}

/// Point-source surface approximation.
///
/// Distances derive from the Haversine epicentral distance; the rupture
/// distance folds in the source depth, matching the classic point-source
/// treatment of regional GMPE studies.
#[derive(Debug, Clone, Copy)]
pub struct PointSurface {
    /// Epicenter.
    pub location: Location,
    /// Depth to the source, km.
    pub z_top: f64,
    /// Nominal dip, degrees.
    pub dip: f64,
    /// Nominal width, km.
    pub width: f64,
}

impl RuptureSurface for PointSurface {
    fn distance_to(&self, loc: &Location) -> Distances {
        let epicentral = self.location.distance_to(loc);
        Distances {
            r_jb: epicentral,
            r_rup: epicentral.hypot(self.z_top),
            r_x: epicentral,
        }
    }

    fn dip(&self) -> f64 {
        self.dip
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn depth(&self) -> f64 {
        self.z_top
    }
}

/// A surface with fixed distance metrics, independent of the site.
///
/// Used for validation and benchmark models where the geometry is known
/// in advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedSurface {
    pub distances: Distances,
    pub dip: f64,
    pub width: f64,
    pub z_top: f64,
}

impl RuptureSurface for FixedSurface {
    fn distance_to(&self, _loc: &Location) -> Distances {
        self.distances
    }

    fn dip(&self) -> f64 {
        self.dip
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn depth(&self) -> f64 {
        self.z_top
    }
}

/// An individual earthquake scenario.
#[derive(Clone)]
pub struct Rupture {
    /// Annual occurrence rate (events per year). In cluster sources this
    /// carries the magnitude-variant weight instead; see
    /// [`cluster`](crate::cluster).
    pub rate: f64,
    /// Moment magnitude.
    pub mag: f64,
    /// Rake angle, degrees.
    pub rake: f64,
    /// Rupture plane geometry.
    pub surface: Arc<dyn RuptureSurface>,
}

impl Rupture {
    /// Create a new Rupture instance.
    pub fn new(rate: f64, mag: f64, rake: f64, surface: Arc<dyn RuptureSurface>) -> Self {
        Self {
            rate,
            mag,
            rake,
            surface,
        }
    }
}

/// A named earthquake source: an ordered collection of ruptures.
#[derive(Clone)]
pub struct Source {
    name: String,
    location: Location,
    ruptures: Vec<Rupture>,
}

impl Source {
    /// Create a new Source instance.
    pub fn new(name: impl Into<String>, location: Location, ruptures: Vec<Rupture>) -> Self {
        Self {
            name: name.into(),
            location,
            ruptures,
        }
    }

    /// Source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Representative location used for coarse distance filtering.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Iterate the ruptures of this source.
    pub fn ruptures(&self) -> impl Iterator<Item = &Rupture> {
        self.ruptures.iter()
    }

    /// Number of ruptures.
    pub fn len(&self) -> usize {
        self.ruptures.len()
    }

    /// Whether the source has no ruptures.
    pub fn is_empty(&self) -> bool {
        self.ruptures.is_empty()
    }
}

/// A set of fault sources believed to rupture jointly.
///
/// Each constituent fault may carry several magnitude variants as its
/// ruptures; the variant weights live in the rupture `rate` field and are
/// reinterpreted by the cluster pipeline. The annual rate of the joint
/// event lives here, on the cluster itself.
#[derive(Clone)]
pub struct ClusterSource {
    name: String,
    location: Location,
    rate: f64,
    weight: f64,
    faults: Vec<Source>,
}

impl ClusterSource {
    /// Create a new ClusterSource instance.
    pub fn new(
        name: impl Into<String>,
        location: Location,
        rate: f64,
        weight: f64,
        faults: Vec<Source>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            rate,
            weight,
            faults,
        }
    }

    /// Cluster name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Representative location used for coarse distance filtering.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Annual rate of the joint rupture event.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Logic-tree weight of the cluster.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The constituent fault sources.
    pub fn faults(&self) -> &[Source] {
        &self.faults
    }
}

/// The sources held by a [`SourceSet`].
pub enum Sources {
    Faults(Vec<Source>),
    Clusters(Vec<ClusterSource>),
}

impl std::fmt::Debug for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sources::Faults(v) => write!(f, "Faults({} sources)", v.len()),
            Sources::Clusters(v) => write!(f, "Clusters({} sources)", v.len()),
        }
    }
}

/// A logical group of sources sharing a GMM catalog and a logic-tree
/// weight.
#[derive(Debug)]
pub struct SourceSet {
    name: String,
    kind: SourceType,
    weight: f64,
    max_distance: f64,
    gmm_set: GmmSet,
    sources: Sources,
}

impl SourceSet {
    /// Create an ordinary (non-cluster) source set.
    ///
    /// # Errors
    ///
    /// Configuration errors for a cluster `kind`, a weight outside
    /// (0, 1], or a non-positive maximum distance.
    pub fn faults(
        name: impl Into<String>,
        kind: SourceType,
        weight: f64,
        max_distance: f64,
        gmm_set: GmmSet,
        sources: Vec<Source>,
    ) -> Result<Self, HazardError> {
        if kind == SourceType::Cluster {
            return Err(HazardError::config(
                "cluster source sets must be built with SourceSet::clusters",
            ));
        }
        Self::checked(name.into(), kind, weight, max_distance, gmm_set, Sources::Faults(sources))
    }

    /// Create a cluster source set.
    pub fn clusters(
        name: impl Into<String>,
        weight: f64,
        max_distance: f64,
        gmm_set: GmmSet,
        clusters: Vec<ClusterSource>,
    ) -> Result<Self, HazardError> {
        Self::checked(
            name.into(),
            SourceType::Cluster,
            weight,
            max_distance,
            gmm_set,
            Sources::Clusters(clusters),
        )
    }

    fn checked(
        name: String,
        kind: SourceType,
        weight: f64,
        max_distance: f64,
        gmm_set: GmmSet,
        sources: Sources,
    ) -> Result<Self, HazardError> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(HazardError::config(format!(
                "source set `{name}` weight {weight} outside (0, 1]"
            )));
        }
        if !(max_distance > 0.0) {
            return Err(HazardError::config(format!(
                "source set `{name}` maximum distance must be positive"
            )));
        }
        Ok(Self {
            name,
            kind,
            weight,
            max_distance,
            gmm_set,
            sources,
        })
    }

    /// Source set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The structural family of the set.
    pub fn kind(&self) -> SourceType {
        self.kind
    }

    /// Logic-tree weight of the set.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Maximum distance (km) at which sources in this set apply.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// The GMMs applicable to this set.
    pub fn gmm_set(&self) -> &GmmSet {
        &self.gmm_set
    }

    /// The sources of the set.
    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// Ordinary sources within the set's maximum distance of a site, in
    /// enumeration order. Empty for cluster sets.
    pub fn sources_within<'a>(&'a self, site: &'a Site) -> impl Iterator<Item = &'a Source> {
        let sources: &[Source] = match &self.sources {
            Sources::Faults(list) => list,
            Sources::Clusters(_) => &[],
        };
        sources
            .iter()
            .filter(move |s| s.location().distance_to(&site.location) <= self.max_distance)
    }

    /// Cluster sources within the set's maximum distance of a site, in
    /// enumeration order. Empty for ordinary sets.
    pub fn clusters_within<'a>(
        &'a self,
        site: &'a Site,
    ) -> impl Iterator<Item = &'a ClusterSource> {
        let clusters: &[ClusterSource] = match &self.sources {
            Sources::Clusters(list) => list,
            Sources::Faults(_) => &[],
        };
        clusters
            .iter()
            .filter(move |c| c.location().distance_to(&site.location) <= self.max_distance)
    }
}

/// A complete hazard model: the source sets of a logic-tree branch.
pub struct HazardModel {
    name: String,
    source_sets: Vec<SourceSet>,
}

impl HazardModel {
    /// Create a new HazardModel instance.
    pub fn new(name: impl Into<String>, source_sets: Vec<SourceSet>) -> Self {
        Self {
            name: name.into(),
            source_sets,
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source sets of the model.
    pub fn source_sets(&self) -> &[SourceSet] {
        &self.source_sets
    }
}
