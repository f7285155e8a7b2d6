use indicatif::{ProgressBar, ProgressStyle};

/// Row progress for the geocoding stage. Hidden bars accept updates and draw nothing.
pub fn create_progress_bar(total: u64, message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb.set_message(message.to_string());
    pb
}

pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_tracks_position() {
        let pb = create_progress_bar(3, "Geocoding", false);
        pb.inc(1);
        pb.inc(1);
        assert_eq!(pb.position(), 2);
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }
}
