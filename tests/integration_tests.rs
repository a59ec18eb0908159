//! End-to-end pipeline tests over whole programs.

use pretty_assertions::assert_eq;
use triglot::context::TranslationContext;
use triglot::{
    translate, translate_or_fallback, Language, LanguagePair, Translator, SUPPORTED_PAIRS,
};

fn code_of(outcome: &triglot::TranslationOutcome) -> &str {
    outcome.translated_code.as_deref().expect("translated code")
}

#[test]
fn test_python_if_else_to_java() {
    let source = "\
age = 20
if age >= 18:
    print(\"Adult\")
else:
    print(\"Minor\")
";
    let outcome = translate(source, Language::Python, Language::Java);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "\
public class Main {
    public static void main(String[] args) {
        int age = 20;
        if (age >= 18) {
            System.out.println(\"Adult\");
        } else {
            System.out.println(\"Minor\");
        }
    }
}
"
    );
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_c_printf_to_python_fstring() {
    let source = "\
#include <stdio.h>

int main(void) {
    int x = 5;
    int y = 7;
    int sum = x + y;
    printf(\"Sum: %d\\n\", sum);
    return 0;
}
";
    let outcome = translate(source, Language::C, Language::Python);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "x = 5\ny = 7\nsum = x + y\nprint(f\"Sum: {sum}\")\n"
    );
}

#[test]
fn test_python_negative_index_to_c_sizeof_idiom() {
    let source = "numbers = [10, 20, 30]\nprint(numbers[-1])\n";
    let outcome = translate(source, Language::Python, Language::C);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "\
#include <stdio.h>

int main(void) {
    int numbers[3] = {10, 20, 30};
    printf(\"%d\\n\", numbers[sizeof(numbers) / sizeof(numbers[0]) - 1]);
    return 0;
}
"
    );
}

#[test]
fn test_java_ternary_to_python_conditional() {
    let source = "\
public class Main {
    public static void main(String[] args) {
        int score = 75;
        String grade = score >= 60 ? \"Pass\" : \"Fail\";
        System.out.println(grade);
    }
}
";
    let outcome = translate(source, Language::Java, Language::Python);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "score = 75\ngrade = \"Pass\" if score >= 60 else \"Fail\"\nprint(grade)\n"
    );
}

#[test]
fn test_unsupported_construct_degrades_with_warning() {
    let source = "\
def greet(name):
    print(\"hi\")

age = 1
";
    let outcome = translate(source, Language::Python, Language::Java);
    assert!(outcome.success);
    assert!(!outcome.warnings.is_empty());
    let code = code_of(&outcome);
    assert!(code.contains("// def greet(name):"));
    assert!(code.contains("int age = 1;"));
}

#[test]
fn test_identity_pair_is_rejected() {
    let outcome = translate("x = 1\n", Language::Python, Language::Python);
    assert!(!outcome.success);
    assert!(outcome.translated_code.is_none());
    assert!(outcome
        .error
        .as_deref()
        .unwrap()
        .contains("Unsupported language pair"));
}

#[test]
fn test_all_six_pairs_produce_programs() {
    let snippet = |lang: Language| match lang {
        Language::Python => "x = 1\nprint(x)\n",
        Language::C => "int x = 1;\nprintf(\"%d\\n\", x);\n",
        Language::Java => "int x = 1;\nSystem.out.println(x);\n",
    };
    for pair in SUPPORTED_PAIRS {
        let outcome = translate(snippet(pair.source), pair.source, pair.target);
        assert!(outcome.success, "{pair}: {:?}", outcome.error);
        let code = code_of(&outcome);
        assert!(!code.trim().is_empty(), "{pair}");
        assert!(outcome.warnings.is_empty(), "{pair}: {:?}", outcome.warnings);
        assert_eq!(outcome.service_used, "pipeline", "{pair}");
    }
}

#[test]
fn test_blank_runs_collapse_to_one() {
    let source = "int a = 1;\n\n\n\nint b = 2;\n";
    let outcome = translate(source, Language::C, Language::Python);
    assert!(outcome.success);
    assert_eq!(code_of(&outcome), "a = 1\n\nb = 2\n");
}

#[test]
fn test_trailing_comments_stay_on_their_line() {
    let source = "int count = 1; // how many\n";
    let outcome = translate(source, Language::C, Language::Python);
    assert!(outcome.success);
    assert_eq!(code_of(&outcome), "count = 1  # how many\n");
}

#[test]
fn test_java_concat_println_to_python() {
    let source = "int age = 30;\nSystem.out.println(\"Age: \" + age);\n";
    let outcome = translate(source, Language::Java, Language::Python);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(code_of(&outcome), "age = 30\nprint(f\"Age: {age}\")\n");
}

#[test]
fn test_python_for_range_to_c() {
    let source = "for i in range(3):\n    print(i)\n";
    let outcome = translate(source, Language::Python, Language::C);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "\
#include <stdio.h>

int main(void) {
    for (int i = 0; i < 3; i++) {
        printf(\"%d\\n\", i);
    }
    return 0;
}
"
    );
}

#[test]
fn test_c_do_while_to_python() {
    let source = "\
int x = 3;
do {
    x = x - 1;
} while (x > 0);
";
    let outcome = translate(source, Language::C, Language::Python);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(
        code_of(&outcome),
        "x = 3\nwhile True:\n    x = x - 1\n    if not (x > 0):\n        break\n"
    );
}

#[test]
fn test_boolean_name_heuristic_promotes_declaration() {
    let outcome = translate("is_valid = 1\n", Language::Python, Language::Java);
    assert!(outcome.success);
    assert_eq!(
        code_of(&outcome),
        "\
public class Main {
    public static void main(String[] args) {
        boolean is_valid = true;
    }
}
"
    );
}

#[test]
fn test_strict_types_keeps_numeric_literal() {
    let pair = LanguagePair::new(Language::Python, Language::Java);
    let translator = Translator::new(pair).unwrap();
    let mut ctx = TranslationContext::new(pair);
    ctx.strict_types = true;
    let result = translator.translate_with("is_valid = 1\n", &mut ctx).unwrap();
    assert!(result.code.contains("int is_valid = 1;"));
}

#[test]
fn test_fallback_wraps_unparseable_source() {
    let source = "int x = 1;\n}\n";
    let outcome = translate_or_fallback(source, Language::C, Language::Java);
    assert!(outcome.success);
    assert_eq!(outcome.service_used, "fallback");
    let code = code_of(&outcome);
    assert!(code.contains("public class Main {"));
    assert!(code.contains("// int x = 1;"));
    assert!(outcome.warnings.iter().any(|w| w.contains("Parse error")));
}

#[test]
fn test_fallback_not_used_when_pipeline_succeeds() {
    let outcome = translate_or_fallback("x = 1\n", Language::Python, Language::C);
    assert!(outcome.success);
    assert_eq!(outcome.service_used, "pipeline");
}

#[test]
fn test_python_bool_to_c_flags_stdbool() {
    let outcome = translate("flag = True\n", Language::Python, Language::C);
    assert!(outcome.success);
    let code = code_of(&outcome);
    assert!(code.contains("#include <stdbool.h>"));
    assert!(code.contains("bool flag = true;"));
}

#[test]
fn test_java_printf_to_python() {
    let source = "double avg = 4.5;\nSystem.out.printf(\"avg=%.2f%n\", avg);\n";
    let outcome = translate(source, Language::Java, Language::Python);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(code_of(&outcome), "avg = 4.5\nprint(f\"avg={avg:.2f}\")\n");
}

#[test]
fn test_comments_survive_translation() {
    let source = "# set things up\nx = 1\n";
    let outcome = translate(source, Language::Python, Language::C);
    assert!(outcome.success);
    let code = code_of(&outcome);
    assert!(code.contains("    // set things up"));
    assert!(code.contains("    int x = 1;"));
}
