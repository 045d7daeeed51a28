fn main() {
    gto_trainer::cli::run();
}
