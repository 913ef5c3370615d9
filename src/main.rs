fn main() {
    patchalert::app::startup::startup();
}
