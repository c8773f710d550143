//! Canned content used when a stage cannot reach its API
//!
//! Every stage degrades to these so the user can always finish the wizard.

use crate::models::{FileKind, IngestedFile, Material};

/// Interview used by "try with a sample"
pub const SAMPLE_INTERVIEW: &str = r#"BGN 밝은눈안과 직원 인터뷰 - 검안사 김서연

Q: 오늘 기억에 남는 환자분이 계셨나요?

A: 네, 20대 직장인 분이 오셨어요. 라식 상담을 받으러 오셨는데, 마스크 때문에 안경 김이 서려서 너무 불편했다고 하시더라고요. 매일 아침 안경 찾는 것도 스트레스고, 운동할 때도 계속 흘러내려서 불편하다고 하시면서요.

Q: 그런 분들이 많으신가요?

A: 정말 많으세요. 하루 종일 마스크를 써야 하니까 안경 쓰시는 분들은 정말 답답하실 거예요. 그래서 라식을 고려하시는 분들이 늘어나고 있는 것 같아요.

Q: 상담할 때 어떤 점을 중요하게 생각하시나요?

A: 환자분의 마음을 이해하려고 노력해요. 처음 오시는 분들은 정말 많이 긴장하시거든요. 그럴 때는 차근차근 설명해드리고 옆에서 계속 말씀드려요. 그러면 점점 안정되시더라고요.

Q: 보람을 느끼는 순간은 언제인가요?

A: 며칠 후에 연락이 올 때가 가장 보람있어요. 오늘 그 분도 전화를 주셨는데 "선생님, 정말 신세계네요!" 하시면서 너무 좋아하시더라고요.

Q: 마지막으로 하고 싶은 말씀이 있다면?

A: 비슷한 고민을 하고 계신 분들이 너무 오래 혼자 끙끙 앓지 마셨으면 좋겠어요. 작은 것이라도 궁금한 게 있으시면 편하게 연락주세요. 저희가 항상 여기 있으니까요.
"#;

/// The sample interview as if it had been uploaded
pub fn sample_interview() -> IngestedFile {
    IngestedFile {
        name: "검안사_김서연_인터뷰.txt".to_string(),
        kind: FileKind::Txt,
        size_bytes: SAMPLE_INTERVIEW.len(),
        text: SAMPLE_INTERVIEW.to_string(),
        notice: None,
    }
}

fn material(
    title: &str,
    content: &str,
    keywords: &[&str],
    timestamp: &str,
    usage_point: &str,
    staff: &str,
    audience: &str,
    quote: &str,
) -> Material {
    Material {
        title: title.to_string(),
        content: content.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        timestamp: Some(timestamp.to_string()),
        usage_point: usage_point.to_string(),
        staff_perspective: staff.to_string(),
        target_audience: Some(audience.to_string()),
        direct_quote: Some(quote.to_string()),
        source_quote: quote.to_string(),
        evidence_span: None,
        category: None,
    }
}

/// Fallback material set: one item per category when bucketed
pub fn fallback_materials() -> Vec<Material> {
    vec![
        material(
            "마스크 김서림에 지친 20대 직장인, 라식 수술 후 달라진 아침",
            "매일 아침 안경을 찾는 일상, 운동할 때 흘러내리는 안경, 마스크를 쓰면 바로 생기는 김서림까지. \
             상담실에 오신 20대 직장인 환자분은 \"마스크 때문에 안경 김이 서려서 너무 불편했어요\"라고 하셨어요. \
             며칠 뒤 \"선생님, 정말 신세계네요!\"라는 전화를 받고 저도 모르게 울컥했습니다.",
            &["BGN", "20대", "직장인", "라식", "안경", "마스크", "김서림", "일상"],
            "초반 10-15분",
            "검안사 시점으로 공감대를 만들고 상담부터 이후 연락까지 이어지는 이야기로 전개",
            "검안사",
            "예비 환자",
            "마스크 때문에 안경 김이 서려서 너무 불편했어요",
        ),
        material(
            "정밀 검사 하나하나, 검안사가 이유부터 설명해 드려요",
            "라식·라섹 상담 전에는 각막 두께, 굴절 상태, 안압 등 여러 항목을 정밀하게 검사해요. \
             처음 오신 분들은 검사 종류가 많아 긴장하시는데, 항목마다 왜 필요한지 차근차근 설명드리면 \
             훨씬 편안해하세요. \"이 검사는 왜 하는 거예요?\"라는 질문에 답하는 시간이 저희에게도 소중합니다.",
            &["BGN", "정밀검사", "각막 두께", "굴절", "안압", "검안사"],
            "중반 20-25분",
            "검사 항목별 의미를 환자 눈높이에서 풀어 쓰는 정보형 전개",
            "검안사",
            "기존 환자",
            "이 검사는 왜 하는 거예요?",
        ),
        material(
            "점심시간 직후의 접수 창구, 원무팀의 작은 배려",
            "점심시간 직후에는 접수 창구가 붐비기 쉬워요. 원무팀은 예약 시간대를 조금씩 나누고, \
             기다리시는 동안 따뜻한 차와 안내문을 준비해 두었어요. \"생각보다 금방 불렀네요\"라는 말씀을 \
             들을 때 가장 뿌듯합니다. 작은 배려가 병원 분위기를 만든다고 믿어요.",
            &["BGN", "원무팀", "대기시간", "예약", "안내", "분위기"],
            "후반 30-35분",
            "병원 문화와 잠실점의 일상을 자연스럽게 소개",
            "원무팀",
            "일반인",
            "생각보다 금방 불렀네요",
        ),
        material(
            "신입 간호사의 첫 3개월, 선배 멘토링 덕분에 배운 것들",
            "입사 첫 주에는 환자분 이름을 부르는 것조차 떨렸어요. 선배 간호사 선생님이 매일 퇴근 전에 \
             10분씩 그날 있었던 일을 같이 돌아봐 주셨고, 실수한 부분도 혼내기보다 함께 방법을 찾아 주셨죠. \
             \"처음엔 다 그래, 천천히 하면 돼\"라는 말이 아직도 힘이 됩니다.",
            &["BGN", "신입", "멘토링", "간호사", "팀워크", "선배"],
            "후반 40-45분",
            "실수와 배움 중심의 성장 스토리로 팀워크 강조",
            "간호사",
            "일반인",
            "처음엔 다 그래, 천천히 하면 돼",
        ),
        material(
            "라식 후 언제부터 화장을 해도 될까요? 자주 묻는 질문",
            "상담 중 가장 많이 받는 질문은 '언제부터 세안이나 화장을 해도 되나요?'예요. 개인마다 다르지만 \
             보통 며칠 동안은 눈에 물이 들어가지 않도록 주의해 주셔야 해요. 정확한 시기는 진료 때 꼭 다시 \
             확인해 주세요. 궁금한 점은 편하게 물어보셔도 괜찮아요.",
            &["BGN", "자주 묻는 질문", "세안", "화장", "주의사항", "라식 후"],
            "마무리 50분",
            "질문과 답변 형식으로 부담 없이 읽히는 FAQ 구성",
            "검안사",
            "기존 환자",
            "언제부터 세안이나 화장을 해도 되나요?",
        ),
    ]
}

/// Section headings used when the outline call fails
pub const FALLBACK_SECTIONS: [&str; 5] = [
    "오늘도 이런 일이 있었어요",
    "사실 저희도 많이 배워요",
    "그래서 더 세심하게 봐드렸어요",
    "비슷한 고민을 하고 계신다면",
    "마지막으로 하고 싶은 말",
];

/// Sample post written in the brand voice around a material
pub fn sample_draft(material: &Material, brand: &str, role: &str, name: &str) -> String {
    let usage = &material.usage_point;
    let content = &material.content;
    let title = &material.title;
    format!(
        r#"# {title}

안녕하세요, **{brand}** {role} **{name}**입니다.

## {s0}

아침부터 한 분이 상담실로 들어오시더라고요. 표정이 조금 어두우셨는데, 이야기를 나눠 보니 이런 사연이 있었어요.

{content}

그 말씀을 들으면서 저도 마음이 좀 아팠습니다. 정말 많은 분들이 비슷한 고민을 안고 계시거든요. 처음에는 조금 긴장하셨던 것 같아요. 그래도 이야기를 나누면서 점점 마음을 여시더라고요.

겉으로는 단순해 보이는 문제일 수도 있지만, 그 뒤에는 긴 고민의 시간이 있었을 거예요. 저희한테 오시기까지도 용기가 필요하셨을 텐데... 그런 마음을 생각하면 더 세심하게 봐드려야겠다는 생각이 들어요.

## {s1}

이런 분들을 만날 때마다 느끼는 건데요, 환자분들이 저희에게 많은 걸 가르쳐 주시는 것 같습니다. "선생님, 정말 괜찮아질까요?" 하고 솔직하게 물어보실 때면 저도 모르게 웃음이 나왔어요. 그 마음, 정말 잘 알거든요.

"괜찮습니다. 저희가 옆에 있잖아요." 이렇게 말씀드렸더니 조금은 안심하시는 것 같더라고요. 기술적인 설명도 중요하지만, 마음을 나누는 시간이 저는 더 소중하다고 생각해요 :)

## {s2}

{usage}

그래서 평소보다 더 자세히 설명드렸습니다. 하나하나 어떤 의미인지, 일상에서 무엇을 조심하시면 되는지까지요. 작은 거라도 궁금하면 편하게 물어보시라고 했어요. 누구나 가장 궁금해하시는 부분이니까요.

## {s3}

혹시 비슷한 고민을 하고 계신 분이 있다면... 너무 오래 혼자 끙끙 앓지 마세요. 저희가 무리하게 권하지는 않을 거예요. 다만 정확한 정보는 드릴 수 있으니, 스스로 판단하실 수 있도록 도와드릴게요.

상담이 부담스러우시면 일단 전화로라도 물어보세요. 간단한 궁금증이라도 편하게 연락주시면 됩니다. 전문 용어보다는 일상 언어로, 최대한 이해하기 쉽게 설명드릴게요.

## {s4}

오늘 이 이야기를 나누면서 다시 한 번 느꼈습니다. 저희가 하는 일이 누군가의 하루를 더 밝게 만드는 일이라는 걸요. 사실 저희가 특별한 걸 한 건 아니에요. 평소에 하던 대로 세심하게 봐드린 것뿐이거든요. 그런 마음으로 앞으로도 열심히 할게요.

이상으로 **{brand}** {role} **{name}**이었습니다. 오늘도 여러분의 소중한 눈을 생각하며... 좋은 하루 보내세요!"#,
        s0 = FALLBACK_SECTIONS[0],
        s1 = FALLBACK_SECTIONS[1],
        s2 = FALLBACK_SECTIONS[2],
        s3 = FALLBACK_SECTIONS[3],
        s4 = FALLBACK_SECTIONS[4],
    )
}
