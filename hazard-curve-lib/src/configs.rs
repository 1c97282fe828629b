//! Ground motion model preset storage and a bundled demonstration model.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::errors::HazardError;
use crate::gmm::{ALL_GMMS, Gmm, GmmSet, GroundMotionModeling};
use crate::imt::Imt;
use crate::mf2013::{Mf2013, Mf2013Coeffs};
use crate::site::Location;
use crate::source::{
    ClusterSource, HazardModel, PointSurface, Rupture, Source, SourceSet, SourceType,
};

static MODELS: OnceLock<HashMap<Gmm, Arc<dyn GroundMotionModeling>>> = OnceLock::new();

/// Lazily initializes the preset registry and returns the instance
/// registered for a GMM identifier.
///
/// The registry is populated exactly once in a thread-safe manner using
/// [`OnceLock`]; instances are shared read-only across threads.
///
/// # Example
///
/// ```rust
/// use hazard_curve_lib::configs::gmm_instance;
/// use hazard_curve_lib::gmm::Gmm;
/// use hazard_curve_lib::imt::Imt;
///
/// let crustal = gmm_instance(Gmm::Mf2013Crustal);
/// assert!(crustal.supports(Imt::Pga));
/// ```
pub fn gmm_instance(gmm: Gmm) -> Arc<dyn GroundMotionModeling> {
    let models = MODELS.get_or_init(|| {
        ALL_GMMS
            .iter()
            .map(|&gmm| (gmm, Arc::new(preset(gmm)) as Arc<dyn GroundMotionModeling>))
            .collect()
    });
    match models.get(&gmm) {
        Some(model) => Arc::clone(model),
        None => Arc::new(preset(gmm)),
    }
}

/// The Morikawa & Fujiwara (2013) coefficient preset for a GMM identifier.
fn preset(gmm: Gmm) -> Mf2013 {
    match gmm {
        Gmm::Mf2013Crustal => Mf2013::new(
            "mf2013_crustal",
            vec![
                // Crustal PGA
                (
                    Imt::Pga,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.5507,
                        b: -0.004531,
                        c: 0.4631,
                        d: 0.006875,
                        e: 0.5,
                        sigma: 0.377556,
                        pd: 0.0663,
                        dl_min: 100.,
                        d0: 250.,
                        ps: -0.3709,
                        vs_max: 1950.,
                        v0: 350.,
                    },
                ),
                // Crustal PGV
                (
                    Imt::Pgv,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6014,
                        b: -0.002602,
                        c: -1.1779,
                        d: 0.002109,
                        e: 0.5,
                        sigma: 0.341184,
                        pd: 0.2317,
                        dl_min: 60.,
                        d0: 250.,
                        ps: -0.5546,
                        vs_max: 1100.,
                        v0: 350.,
                    },
                ),
                // Crustal PSA 0.3s
                (
                    Imt::Sa0P3,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.563,
                        b: -0.004033,
                        c: 0.639,
                        d: 0.005205,
                        e: 0.5,
                        sigma: 0.407229,
                        pd: 0.1006,
                        dl_min: 21.,
                        d0: 250.,
                        ps: -0.6217,
                        vs_max: 2000.,
                        v0: 350.,
                    },
                ),
                // Crustal PSA 1.0s
                (
                    Imt::Sa1P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6011,
                        b: -0.001955,
                        c: -0.2766,
                        d: 0.00055,
                        e: 0.5,
                        sigma: 0.410513,
                        pd: 0.2744,
                        dl_min: 39.32,
                        d0: 250.,
                        ps: -0.6755,
                        vs_max: 1423.23,
                        v0: 350.,
                    },
                ),
                // Crustal PSA 3.0s
                (
                    Imt::Sa3P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.7089,
                        b: -0.001276,
                        c: -1.6579,
                        d: 0.001021,
                        e: 0.5,
                        sigma: 0.379064,
                        pd: 0.3996,
                        dl_min: 69.69,
                        d0: 250.,
                        ps: -0.4398,
                        vs_max: 864.01,
                        v0: 350.,
                    },
                ),
            ],
        ),
        Gmm::Mf2013Interplate => Mf2013::new(
            "mf2013_interplate",
            vec![
                // Interplate PGA
                (
                    Imt::Pga,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.5507,
                        b: -0.004716,
                        c: 0.5418,
                        d: 0.006875,
                        e: 0.5,
                        sigma: 0.377556,
                        pd: 0.0663,
                        dl_min: 100.,
                        d0: 250.,
                        ps: -0.3709,
                        vs_max: 1950.,
                        v0: 350.,
                    },
                ),
                // Interplate PGV
                (
                    Imt::Pgv,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6014,
                        b: -0.002375,
                        c: -1.2682,
                        d: 0.002109,
                        e: 0.5,
                        sigma: 0.341184,
                        pd: 0.2317,
                        dl_min: 60.,
                        d0: 250.,
                        ps: -0.5546,
                        vs_max: 1100.,
                        v0: 350.,
                    },
                ),
                // Interplate PSA 0.3s
                (
                    Imt::Sa0P3,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.563,
                        b: -0.00388,
                        c: 0.6544,
                        d: 0.005205,
                        e: 0.5,
                        sigma: 0.407229,
                        pd: 0.1006,
                        dl_min: 21.,
                        d0: 250.,
                        ps: -0.6217,
                        vs_max: 2000.,
                        v0: 350.,
                    },
                ),
                // Interplate PSA 1.0s
                (
                    Imt::Sa1P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6011,
                        b: -0.001256,
                        c: -0.4191,
                        d: 0.00055,
                        e: 0.5,
                        sigma: 0.410513,
                        pd: 0.2744,
                        dl_min: 39.32,
                        d0: 250.,
                        ps: -0.6755,
                        vs_max: 1423.23,
                        v0: 350.,
                    },
                ),
                // Interplate PSA 3.0s
                (
                    Imt::Sa3P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.7089,
                        b: -0.00047,
                        c: -1.9088,
                        d: 0.001021,
                        e: 0.5,
                        sigma: 0.379064,
                        pd: 0.3996,
                        dl_min: 69.69,
                        d0: 250.,
                        ps: -0.4398,
                        vs_max: 864.01,
                        v0: 350.,
                    },
                ),
            ],
        ),
        Gmm::Mf2013Intraplate => Mf2013::new(
            "mf2013_intraplate",
            vec![
                // Intraplate PGA
                (
                    Imt::Pga,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.5507,
                        b: -0.005273,
                        c: 0.9338,
                        d: 0.006875,
                        e: 0.5,
                        sigma: 0.377556,
                        pd: 0.0663,
                        dl_min: 100.,
                        d0: 250.,
                        ps: -0.3709,
                        vs_max: 1950.,
                        v0: 350.,
                    },
                ),
                // Intraplate PGV
                (
                    Imt::Pgv,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6014,
                        b: -0.003435,
                        c: -0.8601,
                        d: 0.002109,
                        e: 0.5,
                        sigma: 0.341184,
                        pd: 0.2317,
                        dl_min: 60.,
                        d0: 250.,
                        ps: -0.5546,
                        vs_max: 1100.,
                        v0: 350.,
                    },
                ),
                // Intraplate PSA 0.3s
                (
                    Imt::Sa0P3,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.563,
                        b: -0.004427,
                        c: 1.0482,
                        d: 0.005205,
                        e: 0.5,
                        sigma: 0.407229,
                        pd: 0.1006,
                        dl_min: 21.,
                        d0: 250.,
                        ps: -0.6217,
                        vs_max: 2000.,
                        v0: 350.,
                    },
                ),
                // Intraplate PSA 1.0s
                (
                    Imt::Sa1P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.6011,
                        b: -0.00229,
                        c: -0.024,
                        d: 0.00055,
                        e: 0.5,
                        sigma: 0.410513,
                        pd: 0.2744,
                        dl_min: 39.32,
                        d0: 250.,
                        ps: -0.6755,
                        vs_max: 1423.23,
                        v0: 350.,
                    },
                ),
                // Intraplate PSA 3.0s
                (
                    Imt::Sa3P0,
                    Mf2013Coeffs {
                        mw0: 8.1,
                        a: 0.7089,
                        b: -0.001086,
                        c: -1.5998,
                        d: 0.001021,
                        e: 0.5,
                        sigma: 0.379064,
                        pd: 0.3996,
                        dl_min: 69.69,
                        d0: 250.,
                        ps: -0.4398,
                        vs_max: 864.01,
                        v0: 350.,
                    },
                ),
            ],
        ),
        Gmm::Ab1995 => Mf2013::new(
            "ab1995",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.344,
                    b: -0.0014,
                    c: 1.141,
                    d: 0.0005,
                    e: 0.5,
                    sigma: 0.308,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::As1997 => Mf2013::new(
            "as1997",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.505,
                    b: -0.0029,
                    c: 0.41,
                    d: 0.0026,
                    e: 0.5,
                    sigma: 0.272,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::Asb2013 => Mf2013::new(
            "asb2013",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.495,
                    b: -0.0041,
                    c: 0.468,
                    d: 0.004,
                    e: 0.5,
                    sigma: 0.321,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::Jsgga2022 => Mf2013::new(
            "jsgga2022",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.447,
                    b: -0.0021,
                    c: 0.81,
                    d: 0.0006,
                    e: 0.5,
                    sigma: 0.355,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::Ab1995As1997 => Mf2013::new(
            "ab1995_as1997",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.43,
                    b: -0.0025,
                    c: 0.778,
                    d: 0.0016,
                    e: 0.5,
                    sigma: 0.307,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::Ab1995Asb2013 => Mf2013::new(
            "ab1995_asb2013",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.432,
                    b: -0.0028,
                    c: 0.735,
                    d: 0.0021,
                    e: 0.5,
                    sigma: 0.327,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
        Gmm::Sakh2018As1997 => Mf2013::new(
            "sakh2018_as1997",
            vec![(
                Imt::Pga,
                Mf2013Coeffs {
                    mw0: 8.1,
                    a: 0.552,
                    b: -0.0027,
                    c: 0.115,
                    d: 0.0027,
                    e: 0.5,
                    sigma: 0.301,
                    pd: 0.0663,
                    dl_min: 100.,
                    d0: 250.,
                    ps: -0.3709,
                    vs_max: 1950.,
                    v0: 350.,
                },
            )],
        ),
    }
}

fn point_rupture(rate: f64, mag: f64, lon: f64, lat: f64, depth: f64) -> Rupture {
    Rupture::new(
        rate,
        mag,
        0.0,
        Arc::new(PointSurface {
            location: Location::new(lon, lat),
            z_top: depth,
            dip: 90.0,
            width: 10.0,
        }),
    )
}

/// A small two-branch demonstration model around northern Sakhalin.
///
/// One ordinary fault source set and one cluster source set, so both
/// pipeline branches are exercised. Useful for examples, smoke tests, and
/// the CLI; real hazard models are supplied by external loaders.
pub fn demo_model() -> Result<HazardModel, HazardError> {
    let fault_gmms = GmmSet::builder()
        .gmm(Gmm::Mf2013Crustal, 0.5)
        .gmm_capped(Gmm::Ab1995As1997, 0.3, 200.0)
        .gmm(Gmm::Sakh2018As1997, 0.2)
        .build()?;

    let piltun = Source::new(
        "Piltun fault",
        Location::new(143.2, 52.8),
        vec![
            point_rupture(4e-3, 5.5, 143.2, 52.8, 8.0),
            point_rupture(1e-3, 6.3, 143.2, 52.85, 10.0),
            point_rupture(2e-4, 7.1, 143.25, 52.9, 12.0),
        ],
    );
    let nogliki = Source::new(
        "Nogliki fault",
        Location::new(143.0, 51.8),
        vec![
            point_rupture(2.5e-3, 5.7, 143.0, 51.8, 9.0),
            point_rupture(5e-4, 6.6, 143.05, 51.85, 11.0),
        ],
    );
    let faults = SourceSet::faults(
        "Sakhalin crustal faults",
        SourceType::Fault,
        0.7,
        300.0,
        fault_gmms,
        vec![piltun, nogliki],
    )?;

    let cluster_gmms = GmmSet::builder().gmm(Gmm::Mf2013Crustal, 1.0).build()?;
    let upper = Source::new(
        "Upper Pogranichny section",
        Location::new(142.6, 50.4),
        vec![
            point_rupture(0.6, 6.8, 142.6, 50.4, 6.0),
            point_rupture(0.4, 7.2, 142.6, 50.45, 8.0),
        ],
    );
    let lower = Source::new(
        "Lower Pogranichny section",
        Location::new(142.7, 50.1),
        vec![
            point_rupture(0.7, 6.6, 142.7, 50.1, 6.0),
            point_rupture(0.3, 7.0, 142.7, 50.15, 8.0),
        ],
    );
    let pogranichny = ClusterSource::new(
        "Pogranichny cluster",
        Location::new(142.65, 50.25),
        2e-4,
        1.0,
        vec![upper, lower],
    );
    let clusters = SourceSet::clusters(
        "Pogranichny cluster system",
        0.3,
        300.0,
        cluster_gmms,
        vec![pogranichny],
    )?;

    Ok(HazardModel::new("Sakhalin demo", vec![faults, clusters]))
}
