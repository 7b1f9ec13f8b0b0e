use serde::{Deserialize, Serialize};

/// One converted reading; `t` is epoch milliseconds, possibly fractional
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub t: f64,
    pub v: f64,
}

/// All points of one channel in acquisition order
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    pub channel_id: String,
    pub points: Vec<Point>,
}

/// One full batch, channels in rotation order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Packet {
    pub series: Vec<ChannelSeries>,
}

/// How point timestamps are rendered on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// Integer epoch-ms, floored; neighbouring points may share a value
    #[default]
    Millis,
    /// Epoch-ms with the sub-millisecond back-dating preserved
    FractionalMillis,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireTime {
    Millis(i64),
    Fractional(f64),
}

#[derive(Serialize)]
struct WirePoint {
    t: WireTime,
    v: f64,
}

#[derive(Serialize)]
struct WireSeries<'a> {
    #[serde(rename = "channelId")]
    channel_id: &'a str,
    points: Vec<WirePoint>,
}

impl Packet {
    pub fn channel_count(&self) -> usize {
        self.series.len()
    }

    pub fn points_per_channel(&self) -> usize {
        self.series.first().map(|s| s.points.len()).unwrap_or(0)
    }

    /// Render the collector body: an array of `{channelId, points: [{t, v}]}`
    pub fn to_json(&self, format: TimestampFormat) -> serde_json::Result<Vec<u8>> {
        let wire: Vec<WireSeries<'_>> = self
            .series
            .iter()
            .map(|series| WireSeries {
                channel_id: &series.channel_id,
                points: series
                    .points
                    .iter()
                    .map(|p| WirePoint {
                        t: match format {
                            TimestampFormat::Millis => WireTime::Millis(p.t.floor() as i64),
                            TimestampFormat::FractionalMillis => WireTime::Fractional(p.t),
                        },
                        v: p.v,
                    })
                    .collect(),
            })
            .collect();

        serde_json::to_vec(&wire)
    }
}
