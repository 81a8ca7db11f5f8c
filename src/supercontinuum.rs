use std::{ fs, path::PathBuf };
use anyhow::Result;
use ndarray as nd;
use ndarray_npy::write_npy;
use gnlse::{
    dispersion::TaylorDispersion,
    propagate::{ GnlseSetup, Propagator },
    pulse::{ GaussianEnvelope, LorentzianEnvelope, PulseEnvelope, SechEnvelope },
    raman::BlowWoodRaman,
    solution::Solution,
};

// supercontinuum generation in a photonic-crystal fiber pumped near the
// zero-dispersion wavelength, swept over input pulse shapes

fn main() -> Result<()> {
    let wavelength = 835.0; // nm
    let peak_power = 10e3; // W
    let t_fwhm = 0.050; // ps
    let gamma = 0.11; // 1/W/m
    // derivatives of the propagation constant at 835 nm, β₂... in psⁿ/m
    let betas = vec![
        -11.830e-3,
        8.1038e-5,
        -9.5205e-8,
        2.0737e-10,
        -5.3943e-13,
        1.3486e-15,
        -2.5495e-18,
        3.0524e-21,
        -1.7140e-24,
    ];

    let pulse_models: Vec<Box<dyn PulseEnvelope>> = vec![
        Box::new(SechEnvelope::new(peak_power, t_fwhm)),
        Box::new(GaussianEnvelope::new(peak_power, t_fwhm)),
        Box::new(LorentzianEnvelope::new(peak_power, t_fwhm)),
    ];

    for pulse in pulse_models {
        println!("{}...", pulse.name());
        let label = pulse.name().to_lowercase();
        let mut setup = GnlseSetup::new(
            wavelength,
            0.15, // m
            gamma,
            pulse,
            Box::new(TaylorDispersion::new(0.0, betas.clone())?),
        );
        setup.resolution = 1 << 14;
        setup.time_window = 12.5; // ps
        setup.z_saves = 200;
        setup.self_steepening = true;
        setup.raman = Some(Box::new(BlowWoodRaman::new()));

        let sol = Propagator::new(setup)?.run()?;
        write_solution(&sol, &format!("output/supercontinuum/{label}"))?;
    }
    Ok(())
}

fn write_solution(sol: &Solution, outdir: &str) -> Result<()> {
    let outdir = PathBuf::from(outdir);
    fs::create_dir_all(&outdir)?;
    let nz = sol.distances().len();
    let nt = sol.time_axis().len();
    let mut it: nd::Array2<f64> = nd::Array2::zeros((nz, nt));
    let mut iw: nd::Array2<f64> = nd::Array2::zeros((nz, nt));
    for k in 0..nz {
        it.slice_mut(nd::s![k, ..])
            .assign(&sol.field_at(k).mapv(|ak| ak.norm_sqr()));
        iw.slice_mut(nd::s![k, ..])
            .assign(&sol.spectrum_at(k).mapv(|ak| ak.norm_sqr()));
    }
    write_npy(outdir.join("t.npy"), sol.time_axis())?;
    write_npy(outdir.join("z.npy"), sol.distances())?;
    write_npy(outdir.join("wavelength.npy"), &sol.wavelength_axis())?;
    write_npy(outdir.join("intensity_t.npy"), &it)?;
    write_npy(outdir.join("intensity_w.npy"), &iw)?;
    Ok(())
}
