use afl::fuzz;

fn main() {
    fuzz!(|data: &[u8]| {
        // Convert bytes to string
        if let Ok(input) = std::str::from_utf8(data) {
            // Scan the option string; bad input must error, never panic
            let mut options = kiln::CompilerOptions::new();
            let _ = kiln::options::parse_option_string(&mut options, input);
        }
    });
}
