use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Generates object keys and job names from a millisecond timestamp.
///
/// Timestamps handed out by one instance are strictly increasing, so two
/// requests landing in the same millisecond still get different names.
#[derive(Debug)]
pub struct ResourceNaming {
    upload_prefix: String,
    job_name_prefix: String,
    last_millis: AtomicI64,
}

impl ResourceNaming {
    pub fn new(upload_prefix: impl Into<String>, job_name_prefix: impl Into<String>) -> Self {
        Self {
            upload_prefix: upload_prefix.into(),
            job_name_prefix: job_name_prefix.into(),
            last_millis: AtomicI64::new(0),
        }
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }

    /// `{upload_prefix}/{millis}-{filename}`
    pub fn object_key(&self, filename: &str) -> String {
        let millis = self.next_millis();
        if self.upload_prefix.is_empty() {
            format!("{}-{}", millis, filename)
        } else {
            format!("{}/{}-{}", self.upload_prefix, millis, filename)
        }
    }

    /// `{job_name_prefix}-{millis}`
    pub fn job_name(&self) -> String {
        format!("{}-{}", self.job_name_prefix, self.next_millis())
    }
}

impl Default for ResourceNaming {
    fn default() -> Self {
        Self::new("audio-uploads", "transcription-job")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_name_formats() {
        let naming = ResourceNaming::default();

        let key = naming.object_key("voz.mp3");
        let rest = key.strip_prefix("audio-uploads/").unwrap();
        let (millis, filename) = rest.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(filename, "voz.mp3");

        let job = naming.job_name();
        let millis = job.strip_prefix("transcription-job-").unwrap();
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn test_empty_prefix() {
        let naming = ResourceNaming::new("", "job");
        assert!(!naming.object_key("a.wav").starts_with('/'));
    }

    #[test]
    fn test_same_millisecond_names_differ() {
        let naming = ResourceNaming::default();
        let keys: HashSet<String> = (0..1000).map(|_| naming.object_key("same.wav")).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_unique_across_threads() {
        let naming = Arc::new(ResourceNaming::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let naming = naming.clone();
                std::thread::spawn(move || (0..250).map(|_| naming.job_name()).collect::<Vec<_>>())
            })
            .collect();

        let names: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(names.len(), 1000);
    }
}
