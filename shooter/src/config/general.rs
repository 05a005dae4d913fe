use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct General {
    /// capacity of the queue handing finished captures to the host
    #[serde(deserialize_with = "deserialize_queue")]
    pub queue: usize,
}

fn deserialize_queue<'de, D>(d: D) -> Result<usize, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match s.parse::<usize>() {
        Ok(u) if u > 0 => Ok(u),
        Ok(u) => Err(serde::de::Error::invalid_value(Unexpected::Unsigned(u as u64), &"to be greater than zero. (general.queue)")),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be an usize. (general.queue) {e}").as_str())),
    }
}
