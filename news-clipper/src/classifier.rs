/// Include/exclude keyword filter deciding whether an item is political news.
///
/// Matching is lowercase substring containment, not word matching, so a short
/// keyword also fires inside longer words (the exclude keyword `책` matches
/// `정책`). Exclusion always wins over inclusion.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    include: Vec<String>,
    exclude: Vec<String>,
}

const POLITICAL_KEYWORDS: &[&str] = &[
    "정치", "국정감사", "국회", "의원", "대통령", "총리", "장관", "정부", "정당",
    "여당", "야당", "민주당", "국민의힘", "선거", "투표", "개헌", "법안", "정책",
    "윤석열", "이재명", "한동훈", "조국", "안철수", "김건희", "국정농단",
    "탄핵", "수사", "검찰", "정치인", "공직자", "청와대", "국무총리", "정치권",
    "정치적", "정치판", "정세", "정국", "정치현실", "정치적 갈등",
    "대통령실", "여야", "협치", "정치개혁", "정치제도", "국정운영", "국정과제",
];

const EXCLUDED_KEYWORDS: &[&str] = &[
    // entertainment
    "BTS", "방탄소년단", "블랙핑크", "트와이스", "아이유", "연예인", "배우", "가수",
    "드라마", "영화", "예능", "K-pop", "케이팝", "아이돌", "음악", "콘서트", "앨범",
    // sports
    "스포츠", "축구", "야구", "농구", "올림픽", "월드컵", "경기", "선수", "코치",
    // weather and accidents
    "날씨", "기상", "태풍", "지진", "화재", "교통사고", "사건사고",
    // economy and markets
    "부동산", "집값", "아파트", "경제지표", "주식", "코스피", "환율", "금리", "증시",
    // health
    "코로나", "백신", "의료", "병원", "질병", "치료", "보건", "의학",
    // education
    "교육", "학교", "대학", "입시", "수능", "학생", "교사", "학원",
    // culture
    "문화", "축제", "전시", "박물관", "미술관", "도서", "책", "작가",
];

impl RelevanceClassifier {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: fold_keywords(include),
            exclude: fold_keywords(exclude),
        }
    }

    /// Built-in Korean politics keyword sets.
    pub fn korean_politics() -> Self {
        Self::new(POLITICAL_KEYWORDS, EXCLUDED_KEYWORDS)
    }

    pub fn is_relevant(&self, title: &str, summary: &str) -> bool {
        let text = format!("{} {}", title, summary).to_lowercase();

        if self.exclude.iter().any(|k| text.contains(k.as_str())) {
            return false;
        }
        self.include.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn include_keywords(&self) -> &[String] {
        &self.include
    }

    pub fn exclude_keywords(&self) -> &[String] {
        &self.exclude
    }
}

impl Default for RelevanceClassifier {
    fn default() -> Self {
        Self::korean_politics()
    }
}

fn fold_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
