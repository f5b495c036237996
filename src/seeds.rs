//! Built-in lesson content: cards, summary sheet, keyword lists and feedback templates.
//!
//! Everything here is plain data. The TOML lesson file (see `config`) can replace
//! any of it without touching the classification or resolution logic.

use crate::domain::{
  AnswerLabel, ChecklistItem, LessonSummary, QuestionCard, Resource, ResourceKind,
};
use crate::feedback::{FeedbackTemplate, FeedbackTemplates};

pub const LESSON_TITLE: &str = "지구, 태양 주위를 떠도는 여정!";

/// Ordered keyword lists for the answer classifier. Order is the tie-break policy:
/// the first list with a hit wins. Keywords are written without whitespace.
///
/// Matching is plain substring containment, so short keywords also hit inside other
/// words: "먼" matches "먼저" and sends "먼저 자전축이 기울어져서요" to `distance`.
/// Prefer multi-character keywords when editing these lists.
pub const KEYWORD_RULES: [(AnswerLabel, &[&str]); 4] = [
  (
    AnswerLabel::Distance,
    &["거리", "가까워서", "가까워", "멀어서", "멀어", "가까운", "먼", "distance"],
  ),
  (
    AnswerLabel::Tilt,
    &["자전축", "기울", "23.5", "tilt", "axis"],
  ),
  (
    AnswerLabel::Angle,
    &["각도", "비스듬", "수직", "고도", "높이", "angle"],
  ),
  (
    AnswerLabel::Daylength,
    &["낮의길이", "낮길이", "낮이길", "밤이길", "낮이짧", "밤이짧", "낮시간", "daylength", "daylight"],
  ),
];

fn image(id: &str, title: &str, url: &str, description: &str, caption: &str) -> Resource {
  Resource {
    id: id.into(),
    title: title.into(),
    kind: ResourceKind::Image,
    url: url.into(),
    description: Some(description.into()),
    caption: Some(caption.into()),
  }
}

fn video(id: &str, title: &str, url: &str, description: &str) -> Resource {
  Resource {
    id: id.into(),
    title: title.into(),
    kind: ResourceKind::Video,
    url: url.into(),
    description: Some(description.into()),
    caption: None,
  }
}

/// The four-stage question flow: observe, reason, verify, summarize.
pub fn seed_cards() -> Vec<QuestionCard> {
  vec![
    QuestionCard {
      id: "observe".into(),
      stage: "observe".into(),
      label: "① 관찰 발문".into(),
      question: "계절이 변하는 까닭은 무엇일까요?".into(),
      description: "수업 도입에서, 학생들이 이미 알고 있다고 생각하는 내용을 편안하게 말해 보도록 돕는 단계입니다.".into(),
      example_answers: vec![
        "여름에는 지구가 태양에 가까워져서요.".into(),
        "지구가 기울어져 있어서요.".into(),
      ],
      resources: vec![
        video(
          "orbit_video",
          "지구의 공전과 계절 변화 영상",
          "https://youtu.be/seasonsdemo1",
          "기울어진 자전축을 유지한 채 공전하는 지구를 보여 주는 짧은 영상입니다.",
        ),
      ],
      teacher_notes: vec![
        "계절이 변하는 가장 큰 까닭은 **지구의 자전축이 약 23.5도 기울어진 채로 태양 주위를 공전하기 때문**이에요.".into(),
        "이렇게 기울어진 지구가 공전하면서, 어떤 때에는 우리나라 쪽으로 태양빛이 더 정면에 가깝게 들어오고, 어떤 때에는 더 비스듬히 들어오게 됩니다.".into(),
      ],
    },
    QuestionCard {
      id: "reason".into(),
      stage: "reason".into(),
      label: "② 추론 발문".into(),
      question: "왜 여름에는 태양빛이 더 강하게 느껴질까요?".into(),
      description: "관찰한 내용을 바탕으로, 학생들이 스스로 이유를 추론해 보도록 하는 단계입니다.".into(),
      example_answers: vec!["여름에는 태양이 더 높이 떠서 빛이 수직에 가깝게 들어와요.".into()],
      resources: vec![image(
        "sunlight_angle",
        "수직/비스듬한 태양빛 비교 그림",
        "https://example.com/sunlight-angle-comparison.png",
        "같은 양의 햇빛이 수직으로 비출 때와 비스듬히 비출 때, 땅에 닿는 빛의 농도를 비교한 그림입니다.",
        "수직/비스듬한 햇빛에 따른 에너지 분포 (예시 이미지 URL)",
      )],
      teacher_notes: vec![
        "여름에는 태양이 더 높이 떠 있기 때문에, **태양빛이 땅에 더 수직에 가깝게** 들어옵니다.".into(),
        "빛이 수직에 가깝게 들어오면 **같은 양의 빛이 더 작은 곳에 모여** 비추게 되어, 더 강하고 뜨겁게 느껴집니다.".into(),
        "반대로 겨울에는 태양이 낮게 떠서 빛이 **비스듬히 들어오고**, 같은 양의 빛이 **넓게 퍼져서** 더 약하게 느껴집니다.".into(),
      ],
    },
    QuestionCard {
      id: "verify".into(),
      stage: "verify".into(),
      label: "③ 검증 발문".into(),
      question: "그렇다면 계절은 지구가 태양에 가까워지거나 멀어져서 생긴다고 말해도 될까요?".into(),
      description: "학생들이 떠올린 생각을 검증해 보고, 맞는 부분과 보완이 필요한 부분을 함께 정리하는 단계입니다.".into(),
      example_answers: vec!["아니요, 거리는 크게 달라지지 않아요.".into()],
      resources: vec![image(
        "orbit_distance",
        "지구 공전 궤도와 거리 변화 그림",
        "https://example.com/earth-orbit-distance.png",
        "지구가 타원 궤도로 공전하지만, 거리가 크게 달라지지 않는다는 것을 보여 주는 그림입니다.",
        "지구 공전 궤도와 태양과의 거리 (예시 이미지 URL)",
      )],
      teacher_notes: vec![
        "많은 친구들이 **지구와 태양 사이의 거리가 달라져서** 계절이 생긴다고 생각하지만, 실제로는 그렇지 않습니다.".into(),
        "지구는 1년 동안 타원 궤도로 공전하지만, 그 차이만으로는 여름과 겨울처럼 큰 온도 차이가 생기기 어렵습니다.".into(),
        "따라서 계절 변화의 핵심 이유는 **지구의 자전축 기울기와 공전**이라는 점을 강조해 주시면 좋습니다.".into(),
      ],
    },
    QuestionCard {
      id: "summary".into(),
      stage: "summary".into(),
      label: "④ 개념 정리 발문".into(),
      question: "이제 계절이 생기는 까닭을 한 문장으로 말해 볼까요?".into(),
      description: "지금까지의 대화를 바탕으로, 학생 스스로 핵심 개념을 정리하도록 돕는 단계입니다.".into(),
      example_answers: vec!["지구의 자전축이 기울어진 채로 태양 주위를 공전하기 때문에 계절이 생겨요.".into()],
      resources: vec![image(
        "summary_card",
        "한 문장 개념 정리 카드",
        "https://example.com/season-summary-card.png",
        "수업 마지막에 학생들과 함께 읽을 수 있는 개념 정리 문장을 카드처럼 보여 주세요.",
        "계절이 생기는 까닭 요약 카드 (예시 이미지 URL)",
      )],
      teacher_notes: vec![
        "학생이 말한 문장을 토대로, 꼭 들어가야 할 핵심 표현을 하나씩 보완해 주세요.".into(),
        "예를 들어, \"**지구의 자전축이 기울어진 채로 태양 주위를 공전하기 때문에** 계절이 생긴다\"와 같이 정리할 수 있습니다.".into(),
        "가능하다면 학생과 함께 중요한 단어(자전축, 기울기, 공전, 태양빛의 각도)를 칠판에 정리해 보시는 것도 좋습니다.".into(),
      ],
    },
  ]
}

pub fn seed_summary() -> LessonSummary {
  let item = |key: &str, label: &str| ChecklistItem { key: key.into(), label: label.into() };
  LessonSummary {
    title: "계절이 생기는 까닭 핵심 정리".into(),
    points: vec![
      "**지구의 자전축은 약 23.5도 기울어져** 있습니다.".into(),
      "이 기울어진 상태로 지구가 **태양 주위를 1년에 한 바퀴 공전**합니다.".into(),
      "그래서 어떤 때에는 우리나라 쪽이 태양을 더 정면으로 바라보고, 어떤 때에는 태양을 더 비스듬히 바라보게 됩니다.".into(),
      "이 때문에 한 곳에서도 **태양의 높이(태양 고도)와 햇빛이 들어오는 각도**가 계절에 따라 달라집니다.".into(),
      "태양빛이 더 **수직에 가깝게** 들어오면 여름처럼 더 **뜨겁고 낮이 길게** 느껴지고, 더 **비스듬히** 들어오면 겨울처럼 더 **선선하고 밤이 길게** 느껴집니다.".into(),
    ],
    checklist: vec![
      item("chk_height", "여름과 겨울에 태양의 높이 차이를 설명할 수 있다."),
      item("chk_angle", "빛이 수직/비스듬히 들어올 때의 차이를 설명할 수 있다."),
      item("chk_distance", "계절이 태양과의 거리 때문이라는 생각이 왜 정확하지 않은지 설명할 수 있다."),
      item("chk_tilt_orbit", "자전축 기울기와 공전이 계절과 어떻게 연결되는지 말할 수 있다."),
    ],
    teacher_tips: vec![
      "이 정리는 학생들에게 그대로 읽어 주는 것보다는, 수업이 끝날 무렵 선생님이 핵심을 다시 짚어 보실 때 참고 자료로 활용해 주세요.".into(),
      "학생 스스로 말로 정리하게 한 뒤, 빠진 부분이 있을 때만 이 내용을 보완 자료로 사용하시면 좋습니다.".into(),
    ],
  }
}

fn template(paragraphs: &[&str], follow_up: &str) -> FeedbackTemplate {
  FeedbackTemplate {
    paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
    follow_up: follow_up.into(),
  }
}

pub fn seed_feedback_templates() -> FeedbackTemplates {
  FeedbackTemplates {
    acknowledge: "\"{answer}\"라고 생각해 주었군요. 계절이 왜 바뀌는지 스스로 이유를 떠올려 본 점이 정말 훌륭합니다.".into(),
    empty_prompt: "학생이 대답한 내용을 먼저 적어 주세요. 짧은 한 마디라도 괜찮아요.".into(),
    empty: template(
      &[
        "계절이 바뀔 때 우리 주변에서 달라지는 것들을 먼저 떠올려 보면 이유를 찾기가 쉬워요.",
        "여름과 겨울에 햇빛의 세기, 낮의 길이, 태양의 높이가 어떻게 다른지 생각해 보세요.",
      ],
      "여름과 겨울에 가장 크게 달라진다고 느끼는 것은 무엇인가요?",
    ),
    distance: template(
      &[
        "학생이 **태양과 지구 사이의 거리**에 주목했다는 점은 아주 좋은 관찰이에요.",
        "하지만 실제로는, 지구가 태양을 도는 동안 지구와 태양 사이의 거리는 **생각만큼 크게 달라지지 않기 때문에**, 거리만으로는 여름과 겨울처럼 큰 계절 차이를 설명하기가 어렵습니다.",
        "계절이 생기는 더 중요한 이유는 **지구의 자전축이 약 23.5도 기울어져 있고**, 그 기울어진 채로 **태양 주위를 공전하기 때문**이에요.",
        "그래서 같은 곳이라도 어떤 계절에는 태양빛이 더 수직에 가깝게, 어떤 계절에는 더 비스듬히 들어오게 됩니다.",
      ],
      "만약 거리 때문에 계절이 생긴다면, 북반구와 남반구의 계절은 어떻게 되어야 할까요?",
    ),
    tilt: template(
      &[
        "**자전축의 기울기**를 떠올린 것은 계절의 핵심에 아주 가까이 다가간 생각이에요.",
        "지구의 자전축은 약 23.5도 기울어진 채로 태양 주위를 공전하기 때문에, 위치에 따라 우리나라가 태양을 바라보는 모습이 달라집니다.",
        "이 기울기 때문에 태양의 높이와 낮의 길이가 1년 동안 규칙적으로 바뀌게 돼요.",
      ],
      "만약 지구의 자전축이 기울어져 있지 않다면, 계절은 어떻게 될까요?",
    ),
    angle: template(
      &[
        "**태양빛이 들어오는 각도**에 주목한 것은 아주 좋은 생각이에요.",
        "태양빛이 수직에 가깝게 들어오면 같은 양의 빛이 좁은 면적에 모여 더 뜨겁게 느껴지고, 비스듬히 들어오면 넓게 퍼져서 약하게 느껴집니다.",
        "그런데 계절에 따라 이 각도가 바뀌는 까닭은 **지구의 자전축이 기울어진 채로 공전하기 때문**이라는 점도 함께 정리해 보면 좋아요.",
      ],
      "손전등을 바닥에 수직으로 비출 때와 비스듬히 비출 때, 밝은 부분의 넓이는 어떻게 달라질까요?",
    ),
    daylength: template(
      &[
        "**낮과 밤의 길이**가 달라진다는 것을 알아챈 것은 훌륭한 관찰이에요.",
        "여름에는 낮이 길어서 땅이 태양빛을 받는 시간이 길고, 겨울에는 낮이 짧아서 데워지는 시간이 짧습니다.",
        "낮의 길이가 계절마다 달라지는 까닭도 결국 **기울어진 자전축을 가진 지구가 공전하기 때문**이에요.",
      ],
      "낮의 길이와 태양의 높이는 서로 어떤 관계가 있을까요?",
    ),
    other: template(
      &[
        "계절이 변하는 가장 큰 까닭은 **지구의 자전축이 약 23.5도 기울어진 채로 태양 주위를 공전하기 때문**이에요.",
        "이렇게 기울어진 지구가 공전하면서, 어떤 때에는 우리나라 쪽으로 태양빛이 더 정면에 가깝게 들어오고, 어떤 때에는 더 비스듬히 들어오게 됩니다.",
        "그래서 같은 곳에서도 어떤 계절에는 햇빛이 강하고 낮이 길게 느껴지고, 다른 계절에는 햇빛이 약하고 밤이 길게 느껴지는 거예요.",
      ],
      "여름과 겨울에 태양이 하늘에서 얼마나 높이 떠 있는지 비교해 본 적이 있나요?",
    ),
  }
}
