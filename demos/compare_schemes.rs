use somersault::error::SomersaultError;
use somersault::helpers::build_acrobat;
use somersault::integrators::Integrator;
use somersault::invariants::{
    delta_angular_momentum, delta_total_energy, discrete_angular_momentum, discrete_total_energy,
};
use somersault::plot::{plot_markers, plot_series, Series};
use somersault::producer::{produce_somersault, SomersaultParameters};
use somersault::quadrature::QuadratureRule;
use somersault::solution::Solution;
use somersault::trajectory::Trajectory;
use somersault::types::Float;

/// Run the somersault with each integration scheme, persist and reload the
/// artifacts, recompute the discrete invariants from the reloaded coordinates,
/// and overlay the schemes on four figures.
fn main() -> Result<(), SomersaultError> {
    let params = SomersaultParameters::default();
    let rule: QuadratureRule = "trapezoidal".parse()?;

    let schemes = [
        Integrator::SemiImplicitEuler,
        Integrator::RungeKutta2,
        Integrator::RungeKutta4,
    ];

    let mut energy_series: Vec<Series> = vec![];
    let mut momentum_series: Vec<Series> = vec![];
    let mut delta_energy_series: Vec<Series> = vec![];
    let mut delta_momentum_series: Vec<Series> = vec![];

    for (idx, integrator) in schemes.iter().enumerate() {
        let name = integrator.name();
        let solution = produce_somersault(&params, integrator)?;

        println!("scheme:        {}", name);
        println!("status:        {:?}", solution.status);
        println!("iterations:    {}", solution.iterations);
        println!("cost:          {:.6}", solution.cost);
        println!("solve time:    {:.3} s", solution.real_time_to_solve);

        // Persist the full artifact and the narrow coordinates-plus-time view,
        // then reload the narrow view so the invariants are recomputed from
        // what actually landed on disk.
        solution.save(format!("{}m_{}.json", params.jump_height, name))?;
        solution.trajectory()?.save(format!("{}.json", name))?;
        let trajectory = Trajectory::load(format!("{}.json", name))?;

        let mut model = build_acrobat(&params);
        let energy = discrete_total_energy(&mut model, &trajectory, rule)?;
        let momentum = discrete_angular_momentum(&mut model, &trajectory, rule)?;
        let delta_energy = delta_total_energy(&mut model, &trajectory, rule)?;
        let delta_momentum = delta_angular_momentum(&mut model, &trajectory, rule)?;

        println!("energy drift:  {:+.6e} J", delta_energy);
        println!("ang mom drift: {:+.6e} kg m^2/s", delta_momentum);
        println!();

        // One invariant sample per interval, plotted at the interval start
        let interval_times: Vec<Float> = trajectory.time[..trajectory.n_intervals()].to_vec();
        energy_series.push((
            name.to_string(),
            interval_times
                .iter()
                .zip(energy.iter())
                .map(|(t, e)| (*t, *e))
                .collect(),
        ));
        momentum_series.push((
            name.to_string(),
            interval_times
                .iter()
                .zip(momentum.iter())
                .map(|(t, h)| (*t, *h))
                .collect(),
        ));
        delta_energy_series.push((name.to_string(), vec![(idx as Float, delta_energy)]));
        delta_momentum_series.push((name.to_string(), vec![(idx as Float, delta_momentum)]));
    }

    plot_series(
        &energy_series,
        "Discrete total energy vs. time",
        "total_energy.png",
    );
    plot_series(
        &momentum_series,
        "Discrete angular momentum norm vs. time",
        "angular_momentum.png",
    );
    plot_markers(
        &delta_energy_series,
        "Total energy drift per scheme",
        "delta_total_energy.png",
    );
    plot_markers(
        &delta_momentum_series,
        "Angular momentum drift per scheme",
        "delta_angular_momentum.png",
    );

    Ok(())
}
