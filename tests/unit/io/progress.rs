//! Tests for the phase progress bar

#[cfg(test)]
mod tests {
    use markovtex::io::configuration::PROGRESS_UPDATE_INTERVAL;
    use markovtex::io::progress::ProgressManager;

    // Tests no position is reported before a phase starts
    #[test]
    fn test_idle_manager() {
        let mut pm = ProgressManager::default();
        assert_eq!(pm.position(), None);

        pm.update(10);
        pm.finish_phase();
        assert_eq!(pm.position(), None);
    }

    // Tests redraws happen on the interval and at the end of a phase
    #[test]
    fn test_update_interval() {
        let total = PROGRESS_UPDATE_INTERVAL * 2 + 5;
        let mut pm = ProgressManager::new();
        pm.start_phase("fit", total);
        assert_eq!(pm.position(), Some(0));

        pm.update(1);
        assert_eq!(pm.position(), Some(0));

        pm.update(PROGRESS_UPDATE_INTERVAL);
        assert_eq!(pm.position(), Some(PROGRESS_UPDATE_INTERVAL as u64));

        pm.update(total);
        assert_eq!(pm.position(), Some(total as u64));
    }

    // Tests starting a new phase replaces the previous bar
    #[test]
    fn test_phase_replacement() {
        let mut pm = ProgressManager::new();
        pm.start_phase("fit", 3);
        pm.update(3);

        pm.start_phase("generate", 8);
        assert_eq!(pm.position(), Some(0));

        pm.finish_phase();
        assert_eq!(pm.position(), None);
    }
}
