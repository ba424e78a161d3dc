//! Console output helpers.

use anyhow::Result;
use dicta_core::Profile;

pub fn print_banner(profile: &Profile) {
    println!("=== dicta ===");
    println!("Profile:  {}", profile.name);
    println!("Backend:  {}", profile.backend.display_name());
    println!("Duration: {} seconds", profile.capture.duration_secs);
    println!();
    println!("Recording for {} seconds...", profile.capture.duration_secs);
}

pub fn print_input_devices() -> Result<()> {
    for device in dicta_core::list_input_devices()? {
        if device.is_default {
            println!("{} (default)", device.name);
        } else {
            println!("{}", device.name);
        }
    }
    Ok(())
}
