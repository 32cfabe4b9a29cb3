/// 단계별 입력 폼 (판매자 등록 등)
/// 각 단계의 입력값을 공용 누적 객체에 얕게 병합하고, 마지막 단계에서 한 번에 전송한다.
// region:    --- Imports
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Step Spec

/// 폼 단계 정의
#[derive(Debug, Clone, PartialEq)]
pub struct StepSpec {
    pub name: String,
    pub fields: Vec<String>,
    pub required: Vec<String>,
}

impl StepSpec {
    pub fn new(name: &str, fields: &[&str], required: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            required: required.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// 판매자 등록 단계
pub fn seller_onboarding_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::new(
            "store",
            &["storeName", "storeDescription", "category"],
            &["storeName", "category"],
        ),
        StepSpec::new(
            "contact",
            &["email", "phone", "address", "city", "country"],
            &["email", "phone"],
        ),
        StepSpec::new(
            "payout",
            &["bankName", "accountHolder", "accountNumber"],
            &["accountHolder", "accountNumber"],
        ),
        StepSpec::new("documents", &["logo", "documents"], &[]),
    ]
}

// endregion: --- Step Spec

// region:    --- Wizard

/// 최종 제출 대상
#[async_trait]
pub trait WizardSink: Send + Sync {
    async fn submit(&self, payload: Value) -> Result<Value>;
}

/// 폼 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(usize),
    Submitting,
    Submitted,
}

/// 단계 제출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Advanced(usize),
    Submitted(Value),
}

pub struct FormWizard {
    steps: Vec<StepSpec>,
    accumulator: Map<String, Value>,
    state: WizardState,
    last_error: Option<String>,
}

impl FormWizard {
    pub fn new(steps: Vec<StepSpec>) -> Result<Self> {
        if steps.is_empty() {
            return Err(StorefrontError::Validation(
                "폼에는 최소 한 단계가 필요합니다".to_string(),
            ));
        }
        Ok(Self {
            steps,
            accumulator: Map::new(),
            state: WizardState::Step(1),
            last_error: None,
        })
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// 현재 단계 번호 (1부터, 제출 완료 후에는 다시 1)
    pub fn current_step(&self) -> usize {
        match self.state {
            WizardState::Step(i) => i,
            WizardState::Submitting => self.steps.len(),
            WizardState::Submitted => 1,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_spec(&self) -> &StepSpec {
        &self.steps[self.current_step() - 1]
    }

    pub fn accumulator(&self) -> &Map<String, Value> {
        &self.accumulator
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 현재 단계의 입력값 (누적 객체에서 채움)
    pub fn draft(&self) -> Map<String, Value> {
        self.current_spec()
            .fields
            .iter()
            .map(|field| {
                let value = self.accumulator.get(field).cloned().unwrap_or(Value::Null);
                (field.clone(), value)
            })
            .collect()
    }

    /// 현재 단계 제출
    pub async fn submit_step<S>(&mut self, fields: Map<String, Value>, sink: &S) -> Result<StepOutcome>
    where
        S: WizardSink + ?Sized,
    {
        let step = match self.state {
            WizardState::Step(i) => i,
            WizardState::Submitted => 1,
            WizardState::Submitting => {
                return Err(StorefrontError::Validation(
                    "이미 제출 중입니다".to_string(),
                ))
            }
        };

        let spec = &self.steps[step - 1];
        let missing: Vec<&str> = spec
            .required
            .iter()
            .filter(|key| {
                let value = fields.get(key.as_str()).or_else(|| self.accumulator.get(key.as_str()));
                is_blank(value)
            })
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(StorefrontError::Validation(format!(
                "필수 항목 누락 ({}): {}",
                spec.name,
                missing.join(", ")
            )));
        }

        for (key, value) in fields {
            self.accumulator.insert(key, value);
        }

        if step < self.steps.len() {
            self.state = WizardState::Step(step + 1);
            info!("{:<12} --> {}단계로 이동", "Wizard", step + 1);
            return Ok(StepOutcome::Advanced(step + 1));
        }

        let last = self.steps.len();
        self.state = WizardState::Submitting;
        info!("{:<12} --> 최종 제출 시작", "Wizard");
        let payload = Value::Object(self.accumulator.clone());

        // 제출 도중 future 가 버려지면 guard 가 Step(N) 으로 되돌린다
        let guard = SubmitGuard {
            state: &mut self.state,
            fallback: last,
            armed: true,
        };

        match sink.submit(payload).await {
            Ok(response) => {
                info!("{:<12} --> 최종 제출 성공", "Wizard");
                self.accumulator.clear();
                self.last_error = None;
                guard.settle(WizardState::Submitted);
                Ok(StepOutcome::Submitted(response))
            }
            Err(e) => {
                error!("{:<12} --> 최종 제출 실패: {:?}", "Wizard", e);
                self.last_error = Some(e.to_string());
                guard.settle(WizardState::Step(last));
                Err(e)
            }
        }
    }

    /// 이전 단계로 (입력값은 유지)
    pub fn back(&mut self) -> bool {
        match self.state {
            WizardState::Step(i) if i > 1 => {
                self.state = WizardState::Step(i - 1);
                true
            }
            _ => false,
        }
    }
}

/// 제출 중 상태 복구
struct SubmitGuard<'a> {
    state: &'a mut WizardState,
    fallback: usize,
    armed: bool,
}

impl SubmitGuard<'_> {
    fn settle(mut self, next: WizardState) {
        *self.state = next;
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("{:<12} --> 제출이 중단되어 {}단계로 복귀", "Wizard", self.fallback);
            *self.state = WizardState::Step(self.fallback);
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

// endregion: --- Wizard
