use std::{ fs, path::PathBuf };
use anyhow::Result;
use ndarray as nd;
use ndarray_npy::write_npy;
use gnlse::{
    dispersion::TaylorDispersion,
    propagate::{ GnlseSetup, Propagator },
    pulse::SechEnvelope,
    solution::Solution,
};

// propagate a sech pulse at the fundamental-soliton power, then at twice
// and half that power to show the breathing/compression departure from
// soliton invariance

fn soliton_peak_power(beta2: f64, gamma: f64, t0: f64) -> f64 {
    -beta2 / (gamma * t0 * t0)
}

fn main() -> Result<()> {
    let wavelength = 775.0; // nm
    let t_fwhm = 0.100; // ps
    // the envelope takes the FWHM of |A|²; scale so t₀ = t_fwhm
    let m0 = 2.0 * 1.0_f64.asinh();
    let beta2 = -10.371877e-3; // ps²/m
    let beta3 = 0.0; // ps³/m
    let gamma = 0.47715253369; // 1/W/m

    let p0 = soliton_peak_power(beta2, gamma, t_fwhm);
    println!("fundamental soliton power: {p0:.6} W");

    for (label, power) in [("p0", p0), ("2p0", 2.0 * p0), ("p0_half", p0 / 2.0)] {
        println!("{label}...");
        let mut setup = GnlseSetup::new(
            wavelength,
            100.0, // m
            gamma,
            Box::new(SechEnvelope::new(power, t_fwhm * m0)),
            Box::new(TaylorDispersion::new(0.0, vec![beta2, beta3])?),
        );
        setup.resolution = 1 << 13;
        setup.time_window = 12.5; // ps
        setup.z_saves = 200;

        let sol = Propagator::new(setup)?.run()?;
        write_solution(&sol, &format!("output/solitons/{label}"))?;
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
