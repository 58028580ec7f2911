mod bootstrap;
mod gameplay;
mod levelgen;

pub(crate) fn run() -> Result<(), flagrun_engine::AppError> {
    let wiring = bootstrap::build_app();
    flagrun_engine::run_app(wiring.config, wiring.scene)
}
