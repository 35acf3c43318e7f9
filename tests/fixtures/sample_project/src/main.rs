// [[anchor:entry|Program entry]]
mod setup;

fn main() {
    // See [[link:init|initialisation]] before changing startup order.
    setup::init();
}
