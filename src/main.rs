fn main() {
    pointset_inspector::cli::run();
}
