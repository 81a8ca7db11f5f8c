use std::{ fs, path::PathBuf };
use anyhow::Result;
use ndarray as nd;
use ndarray_npy::write_npy;
use gnlse::{
    dispersion::TaylorDispersion,
    propagate::{ GnlseSetup, Propagator },
    pulse::GaussianEnvelope,
    solution::Solution,
};

// purely linear propagation of a gaussian pulse: dispersion only

fn main() -> Result<()> {
    let wavelength = 775.0; // nm
    let peak_power = 10e3; // W
    let t_fwhm = 0.100; // ps
    let beta2 = -10.4e-3; // ps²/m
    let beta3 = 0.0; // ps³/m

    let mut setup = GnlseSetup::new(
        wavelength,
        0.1, // m
        0.0, // γ = 0: no nonlinearity
        Box::new(GaussianEnvelope::new(peak_power, t_fwhm)),
        Box::new(TaylorDispersion::new(0.0, vec![beta2, beta3])?),
    );
    setup.resolution = 1 << 13;
    setup.time_window = 12.5; // ps
    setup.z_saves = 200;

    let sol = Propagator::new(setup)?.run()?;
    write_solution(&sol, "output/linear")?;
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
