use vergen::Emitter;
use vergen_git2::Git2Builder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // `--version` only reports the commit sha
    match Git2Builder::default().sha(true).build() {
        Ok(git2) => {
            Emitter::default().add_instructions(&git2)?.emit()?;
        }
        Err(_) => {
            // Not a git checkout, e.g. a crates.io build
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        }
    }
    Ok(())
}
