use std::fmt;

use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
    de::DeserializeOwned,
};

use crate::{
    game_service::GameService,
    hand::{
        HandRecord,
        HandStart,
        HandUpdate,
        PlayerAction,
    },
};

/// HTTP client for the dealer server.
#[derive(Clone)]
pub struct GameClient {
    base_url: String,
    http: reqwest::Client,
}

impl GameClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for the game server")?;
        Ok(Self { base_url, http })
    }

    async fn post_json<B, T>(&self, url: String, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .wrap_err("game server request failed")?;
        Self::decode(res).await
    }

    async fn get_json<T>(&self, url: String) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .wrap_err("game server request failed")?;
        Self::decode(res).await
    }

    async fn decode<T>(res: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .wrap_err("failed to read game server response body")?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(eyre!("game server responded with {status}: {body}"));
        }
        serde_json::from_slice(&bytes).wrap_err("invalid game server payload")
    }
}

impl GameService for GameClient {
    async fn start_hand(&mut self, num_players: u32, dealer_index: u32) -> Result<HandStart> {
        let url = format!("{}/hands/start", self.base_url);
        let dto: StartResponseDto = self
            .post_json(
                url,
                &StartRequestDto {
                    num_players,
                    dealer_index,
                },
            )
            .await?;
        Ok(dto.into())
    }

    async fn submit_action(
        &mut self,
        hand_id: &str,
        action: &PlayerAction,
    ) -> Result<HandUpdate> {
        let url = format!("{}/hands/{}/action", self.base_url, hand_id);
        let dto: HandUpdateDto = self
            .post_json(
                url,
                &ActionRequestDto {
                    action: action.wire(),
                },
            )
            .await?;
        Ok(dto.into())
    }

    async fn hand_state(&mut self, hand_id: &str) -> Result<HandUpdate> {
        let url = format!("{}/hands/{}", self.base_url, hand_id);
        let dto: HandUpdateDto = self.get_json(url).await?;
        Ok(dto.into())
    }

    async fn hand_result(&mut self, hand_id: &str) -> Result<HandRecord> {
        let url = format!("{}/hands/{}/result", self.base_url, hand_id);
        let dto: HandRecordDto = self.get_json(url).await?;
        Ok(dto.into())
    }

    async fn hand_history(&mut self) -> Result<Vec<HandRecord>> {
        let url = format!("{}/hands/", self.base_url);
        let dtos: Vec<HandRecordDto> = self.get_json(url).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn reset_table(&mut self, starting_stack: u64) -> Result<String> {
        let url = format!("{}/hands/reset", self.base_url);
        let dto: MessageDto = self
            .post_json(url, &ResetRequestDto { starting_stack })
            .await?;
        Ok(dto.message)
    }

    async fn apply_stacks(&mut self, stack: u64) -> Result<String> {
        let url = format!("{}/hands/stacks", self.base_url);
        let dto: MessageDto = self.post_json(url, &StacksRequestDto { stack }).await?;
        Ok(dto.message)
    }
}

impl fmt::Display for GameClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

#[derive(Serialize)]
struct StartRequestDto {
    num_players: u32,
    dealer_index: u32,
}

#[derive(Serialize)]
struct ActionRequestDto {
    action: String,
}

#[derive(Serialize)]
struct ResetRequestDto {
    starting_stack: u64,
}

#[derive(Serialize)]
struct StacksRequestDto {
    stack: u64,
}

#[derive(Deserialize)]
struct StartResponseDto {
    game_id: String,
    log: Vec<String>,
}

#[derive(Deserialize)]
struct HandUpdateDto {
    #[serde(default)]
    actions: Vec<String>,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    hands: Vec<String>,
}

#[derive(Deserialize)]
struct HandRecordDto {
    id: String,
    #[serde(rename = "mainInfo")]
    main_info: String,
    dealt: String,
    actions: String,
    result: String,
}

#[derive(Deserialize)]
struct MessageDto {
    message: String,
}

impl From<StartResponseDto> for HandStart {
    fn from(dto: StartResponseDto) -> Self {
        HandStart {
            id: dto.game_id,
            log: dto.log,
        }
    }
}

impl From<HandUpdateDto> for HandUpdate {
    fn from(dto: HandUpdateDto) -> Self {
        HandUpdate {
            actions: dto.actions,
            finished: dto.finished,
            summaries: dto.hands,
        }
    }
}

impl From<HandRecordDto> for HandRecord {
    fn from(dto: HandRecordDto) -> Self {
        HandRecord {
            id: dto.id,
            main_info: dto.main_info,
            dealt: dto.dealt,
            actions: dto.actions,
            result: dto.result,
        }
    }
}
