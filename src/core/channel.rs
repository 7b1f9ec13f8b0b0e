use serde::{Deserialize, Serialize};

/// One logical input of the front-end, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub index: usize,
    pub label: String,
}

/// Channels in configured rotation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    channels: Vec<Channel>,
}

impl ChannelSet {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Channel {
                index,
                label: label.into(),
            })
            .collect();

        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_label_order() {
        let set = ChannelSet::from_labels(["Fp1", "O1", "T3"]);

        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0).unwrap().label, "Fp1");
        assert_eq!(set.get(2).unwrap().index, 2);
        assert!(set.get(3).is_none());
        assert_eq!(set.labels(), vec!["Fp1", "O1", "T3"]);
    }
}
