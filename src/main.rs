fn main() {
    aptdeps::cli::run();
}
