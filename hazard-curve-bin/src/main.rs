mod cmd_args;
use clap::Parser;
use hazard_curve_lib::config::CalcConfig;
use hazard_curve_lib::configs::demo_model;
use hazard_curve_lib::exceedance::{ALL_EXCEEDANCE_MODELS, ExceedanceModel};
use hazard_curve_lib::gmm::ALL_GMMS;
use hazard_curve_lib::imt::Imt;
use hazard_curve_lib::readers::read_sites;
use hazard_curve_lib::vectorized::{compute_level_stats, hazard_curve_vec, uniform_hazard_levels};
use hazard_curve_lib::writers::{write_hazard_level_points, write_total_curves};

use crate::cmd_args::CmdArgs;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cmd_args = CmdArgs::parse();
    println!("{cmd_args:?}");

    if cmd_args.list_gmms {
        for gmm in ALL_GMMS {
            println!("{}", gmm.name());
        }
    };

    if cmd_args.list_sigma_models {
        for model in ALL_EXCEEDANCE_MODELS {
            println!("{model}");
        }
    };

    if let Some(ref site_file) = cmd_args.site_file {
        println!("Use {site_file} as input sites...");
        let delim = cmd_args.delimeter as u8;
        let sites = read_sites(site_file, delim)?;

        let imts = cmd_args
            .imts
            .iter()
            .map(|text| text.parse::<Imt>())
            .collect::<Result<Vec<_>, _>>()?;
        let sigma_model: ExceedanceModel = cmd_args.sigma_model.parse()?;
        let config = CalcConfig::builder()
            .imts(imts)
            .exceedance_model(sigma_model)
            .truncation_level(cmd_args.truncation_level)
            .build()?;
        println!("Use sigma model {sigma_model} at n = {}", cmd_args.truncation_level);

        let model = demo_model()?;
        println!("Use hazard model `{}`", model.name());

        println!("Calculate hazard for {} sites...", sites.len());
        let results = hazard_curve_vec(&model, &config, &sites)?;

        for (index, result) in results.iter().enumerate() {
            let site = &sites[index];
            println!(
                "Site {index} at ({}, {}), vs30 = {}:",
                site.location.lon, site.location.lat, site.vs30
            );
            for (imt, curve) in result.total_curves()?.iter() {
                let peak = curve.ys().first().copied().unwrap_or_default();
                println!("  {imt}: {} curve sets, rate at lowest level {peak:e}", result.len());
            }
            let out_file = format!("{}_{index}.txt", cmd_args.out_prefix);
            println!("Write hazard curves to {out_file}...");
            write_total_curves(&out_file, delim, result)?;
        }

        if let Some(return_period) = cmd_args.return_period {
            let imt = *config.imts().first().ok_or("no IMT configured")?;
            let rate = 1.0 / return_period;
            println!("Extract {imt} levels at {return_period}-year return period...");
            let points = uniform_hazard_levels(&results, &sites, imt, rate)?;
            match compute_level_stats(&points) {
                Some(stats) => println!("Stats for level grid:\n{stats:#?}"),
                None => println!("No site curve brackets the target rate."),
            }
            let out_file = format!("{}_levels.txt", cmd_args.out_prefix);
            println!("Write hazard levels to {out_file}...");
            write_hazard_level_points(&out_file, delim, &points)?;
        }
        println!("Done");
    };

    Ok(())
}
