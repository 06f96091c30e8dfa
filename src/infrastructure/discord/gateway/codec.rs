use flate2::{Decompress, FlushDecompress, Status};

use super::constants::ZLIB_SUFFIX;
use super::error::{GatewayError, GatewayResult};
use super::events::{DispatchEvent, UnavailableGuild};
use super::payloads::{GatewayMessage, GuildStubPayload, HelloPayload, MessagePayload, ReadyPayload};

use crate::domain::entities::{BotUser, InboundMessage, MessageAuthor};

const INITIAL_BUFFER_SIZE: usize = 32 * 1024;
const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

pub struct GatewayCodec {
    inflater: Decompress,
    compressed_buffer: Vec<u8>,
    decompressed_buffer: Vec<u8>,
}

impl GatewayCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflater: Decompress::new(true),
            compressed_buffer: Vec::with_capacity(4096),
            decompressed_buffer: Vec::with_capacity(INITIAL_BUFFER_SIZE),
        }
    }

    pub fn decode_binary(&mut self, data: &[u8]) -> GatewayResult<Option<String>> {
        self.compressed_buffer.extend_from_slice(data);

        if !self.is_message_complete() {
            return Ok(None);
        }

        let result = self.decompress()?;
        self.compressed_buffer.clear();
        Ok(Some(result))
    }

    fn is_message_complete(&self) -> bool {
        self.compressed_buffer.len() >= 4
            && self.compressed_buffer[self.compressed_buffer.len() - 4..] == ZLIB_SUFFIX
    }

    fn decompress(&mut self) -> GatewayResult<String> {
        self.decompressed_buffer.clear();

        if self.decompressed_buffer.capacity() < INITIAL_BUFFER_SIZE {
            self.decompressed_buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let mut total_in = 0;
        let mut total_out = 0;

        loop {
            if self.decompressed_buffer.len() == self.decompressed_buffer.capacity() {
                let new_capacity = self
                    .decompressed_buffer
                    .capacity()
                    .saturating_mul(2)
                    .min(MAX_BUFFER_SIZE);

                if new_capacity == self.decompressed_buffer.capacity() {
                    return Err(GatewayError::compression(
                        "decompressed data exceeds maximum size".to_string(),
                    ));
                }

                self.decompressed_buffer.reserve(new_capacity);
            }

            let spare_capacity =
                self.decompressed_buffer.capacity() - self.decompressed_buffer.len();
            self.decompressed_buffer
                .resize(self.decompressed_buffer.len() + spare_capacity, 0);

            let in_before = self.inflater.total_in();
            let out_before = self.inflater.total_out();

            let status = self
                .inflater
                .decompress(
                    &self.compressed_buffer[total_in..],
                    &mut self.decompressed_buffer[total_out..],
                    FlushDecompress::Sync,
                )
                .map_err(|e| GatewayError::compression(e.to_string()))?;

            let consumed = usize::try_from(self.inflater.total_in() - in_before).unwrap_or(0);
            let produced = usize::try_from(self.inflater.total_out() - out_before).unwrap_or(0);

            total_in += consumed;
            total_out += produced;

            self.decompressed_buffer.truncate(total_out);

            match status {
                Status::Ok | Status::BufError => {
                    if total_in >= self.compressed_buffer.len() {
                        break;
                    }
                }
                Status::StreamEnd => {
                    break;
                }
            }
        }

        String::from_utf8(self.decompressed_buffer[..total_out].to_vec())
            .map_err(|e| GatewayError::compression(format!("invalid UTF-8: {e}")))
    }

    pub fn reset(&mut self) {
        self.inflater.reset(true);
        self.compressed_buffer.clear();
        self.decompressed_buffer.clear();
    }
}

impl Default for GatewayCodec {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventParser;

impl EventParser {
    pub fn parse_message(json: &str) -> GatewayResult<GatewayMessage> {
        serde_json::from_str(json).map_err(|e| GatewayError::serialization(e.to_string()))
    }

    pub fn parse_hello(data: &serde_json::Value) -> GatewayResult<HelloPayload> {
        serde_json::from_value(data.clone())
            .map_err(|e| GatewayError::serialization(format!("Failed to parse Hello: {e}")))
    }

    pub fn parse_dispatch(
        event_type: &str,
        data: Option<serde_json::Value>,
    ) -> GatewayResult<DispatchEvent> {
        let data = data.ok_or_else(|| GatewayError::protocol("Missing dispatch data"))?;

        match event_type {
            "READY" => Self::parse_ready(data),
            "MESSAGE_CREATE" => Self::parse_message_create(data),
            "GUILD_CREATE" => {
                let guild = Self::parse_guild_stub(data, "GuildCreate")?;
                Ok(DispatchEvent::GuildCreate {
                    guild_id: guild.id,
                    unavailable: guild.unavailable,
                })
            }
            "GUILD_DELETE" => {
                let guild = Self::parse_guild_stub(data, "GuildDelete")?;
                Ok(DispatchEvent::GuildDelete {
                    guild_id: guild.id,
                    unavailable: guild.unavailable,
                })
            }
            _ => Ok(DispatchEvent::Unknown {
                event_type: event_type.to_string(),
            }),
        }
    }

    fn parse_ready(data: serde_json::Value) -> GatewayResult<DispatchEvent> {
        let ready: ReadyPayload = serde_json::from_value(data)
            .map_err(|e| GatewayError::serialization(format!("Failed to parse Ready: {e}")))?;

        let guilds = ready
            .guilds
            .into_iter()
            .map(|g| UnavailableGuild {
                id: g.id,
                unavailable: g.unavailable,
            })
            .collect();

        Ok(DispatchEvent::Ready {
            session_id: ready.session_id,
            resume_gateway_url: ready.resume_gateway_url,
            user: BotUser::new(ready.user.id, ready.user.username),
            guilds,
        })
    }

    fn parse_message_create(data: serde_json::Value) -> GatewayResult<DispatchEvent> {
        let payload: MessagePayload = serde_json::from_value(data).map_err(|e| {
            GatewayError::serialization(format!("Failed to parse MessageCreate: {e}"))
        })?;

        let author = MessageAuthor {
            id: payload.author.id,
            username: payload.author.username,
            bot: payload.author.bot,
        };
        let message = InboundMessage::new(
            payload.id,
            payload.channel_id,
            payload.guild_id,
            author,
            payload.content,
        );
        Ok(DispatchEvent::MessageCreate { message })
    }

    fn parse_guild_stub(data: serde_json::Value, name: &str) -> GatewayResult<GuildStubPayload> {
        serde_json::from_value(data)
            .map_err(|e| GatewayError::serialization(format!("Failed to parse {name}: {e}")))
    }
}
